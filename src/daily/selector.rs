//! Daily set selection
//!
//! Builds today's set from the library for a topic: up to three terms and
//! two sentences, preferring items that match the topic and padding with a
//! uniform random sample of the rest. All randomness goes through the
//! caller's `Rng`, so a seeded generator gives a reproducible set.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::vocab::models::{DailyItem, DailySet, Sentence, Term};
use crate::vocab::seed::DEFAULT_TOPICS;

/// Number of terms in a daily set
pub const DAILY_TERM_COUNT: usize = 3;

/// Number of sentences in a daily set
pub const DAILY_SENTENCE_COUNT: usize = 2;

/// How an item is matched against the daily topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicMatchPolicy {
    /// Category ignores case, explanation/content is matched verbatim
    Legacy,
    /// Both checks ignore case
    #[default]
    CaseInsensitive,
}

impl TopicMatchPolicy {
    fn matches(&self, category: &str, body: &str, topic: &str) -> bool {
        let topic_lower = topic.to_lowercase();
        if category.to_lowercase().contains(&topic_lower) {
            return true;
        }
        match self {
            Self::Legacy => body.contains(topic),
            Self::CaseInsensitive => body.to_lowercase().contains(&topic_lower),
        }
    }

    pub fn matches_term(&self, term: &Term, topic: &str) -> bool {
        self.matches(&term.category, &term.explanation, topic)
    }

    pub fn matches_sentence(&self, sentence: &Sentence, topic: &str) -> bool {
        self.matches(&sentence.category, &sentence.content, topic)
    }
}

/// Take up to `target` items: matching items first in library order, then a
/// uniform sample without replacement from the non-matching rest.
fn select<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    target: usize,
    is_match: impl Fn(&T) -> bool,
    rng: &mut R,
) -> Vec<&'a T> {
    let (mut selected, mut rest): (Vec<&T>, Vec<&T>) = items.iter().partition(|i| is_match(i));

    if selected.len() >= target {
        selected.truncate(target);
        return selected;
    }

    rest.shuffle(rng);
    let missing = target - selected.len();
    selected.extend(rest.into_iter().take(missing));
    selected
}

/// Build the daily set for `date` and `topic` from the library.
///
/// The returned items are copies; the caller persists the set.
pub fn generate_daily_set<R: Rng + ?Sized>(
    date: NaiveDate,
    topic: &str,
    terms: &[Term],
    sentences: &[Sentence],
    policy: TopicMatchPolicy,
    rng: &mut R,
) -> DailySet {
    let selected_terms = select(terms, DAILY_TERM_COUNT, |t| policy.matches_term(t, topic), rng);
    let selected_sentences = select(
        sentences,
        DAILY_SENTENCE_COUNT,
        |s| policy.matches_sentence(s, topic),
        rng,
    );

    let mut items: Vec<DailyItem> = selected_terms
        .into_iter()
        .cloned()
        .map(DailyItem::Term)
        .chain(selected_sentences.into_iter().cloned().map(DailyItem::Sentence))
        .collect();
    items.shuffle(rng);

    log::debug!("Selected {} daily items for topic '{}'", items.len(), topic);

    DailySet::new(date, topic.to_string(), items)
}

/// Pick the topic for a new day uniformly from the pool
pub fn pick_topic<R: Rng + ?Sized>(topics: &[String], rng: &mut R) -> String {
    topics
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| DEFAULT_TOPICS[0].to_string())
}
