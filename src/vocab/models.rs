//! Data models for the vocabulary library and the daily set

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Which library collection an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Term,
    Sentence,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::Sentence => "sentence",
        }
    }
}

/// A vocabulary entry with its translation, explanation and example usages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub term_en: String,
    pub term_zh: String,
    pub explanation: String,
    #[serde(default, deserialize_with = "deserialize_examples")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_notes: Option<String>,
}

/// Older documents can hold `null` examples (or a `null` list); those are dropped
fn deserialize_examples<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let examples: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(examples.unwrap_or_default().into_iter().flatten().collect())
}

/// A standalone business phrase tagged with a usage category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub saved: bool,
}

/// One entry of a daily set. The kind is fixed when the item is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DailyItem {
    Term(Term),
    Sentence(Sentence),
}

impl DailyItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Term(t) => &t.id,
            Self::Sentence(s) => &s.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Term(_) => ItemKind::Term,
            Self::Sentence(_) => ItemKind::Sentence,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Self::Term(t) => Some(t),
            Self::Sentence(_) => None,
        }
    }

    pub fn as_sentence(&self) -> Option<&Sentence> {
        match self {
            Self::Sentence(s) => Some(s),
            Self::Term(_) => None,
        }
    }
}

impl From<Term> for DailyItem {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl From<Sentence> for DailyItem {
    fn from(sentence: Sentence) -> Self {
        Self::Sentence(sentence)
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TaggedItem {
    Term(Term),
    Sentence(Sentence),
}

/// Daily items written before the `kind` tag existed are told apart by
/// their fields: `term_en` for terms, `content` for sentences.
#[derive(Deserialize)]
#[serde(untagged)]
enum DailyItemRepr {
    Tagged(TaggedItem),
    LegacyTerm(Term),
    LegacySentence(Sentence),
}

impl<'de> Deserialize<'de> for DailyItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match DailyItemRepr::deserialize(deserializer)? {
            DailyItemRepr::Tagged(TaggedItem::Term(t)) | DailyItemRepr::LegacyTerm(t) => {
                Self::Term(t)
            }
            DailyItemRepr::Tagged(TaggedItem::Sentence(s)) | DailyItemRepr::LegacySentence(s) => {
                Self::Sentence(s)
            }
        })
    }
}

/// Kind of external learning resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Podcast,
    Video,
    Blog,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Podcast => "podcast",
            Self::Video => "video",
            Self::Blog => "blog",
        }
    }
}

/// A recommended podcast episode, video or article for the daily topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyResource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub summary: String,
}

/// The bundle of items presented for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySet {
    pub date: NaiveDate,
    pub topic: String,
    pub items: Vec<DailyItem>,
    #[serde(default)]
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource: Option<DailyResource>,
}

impl DailySet {
    pub fn new(date: NaiveDate, topic: String, items: Vec<DailyItem>) -> Self {
        Self {
            date,
            topic,
            items,
            completed: false,
            resource: None,
        }
    }

    pub fn is_for(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.items.iter().filter_map(DailyItem::as_term)
    }

    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.items.iter().filter_map(DailyItem::as_sentence)
    }
}

/// Streak and completion bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_check_in: Option<NaiveDate>,
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
}

impl UserProgress {
    pub fn has_completed(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }
}

/// A generated term before it has been given an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDraft {
    pub term_en: String,
    pub term_zh: String,
    pub explanation: String,
    #[serde(default)]
    pub examples: Vec<String>,
    pub category: String,
}

impl TermDraft {
    pub fn into_term(self, saved: bool) -> Term {
        Term {
            id: generated_id("gen_term"),
            term_en: self.term_en,
            term_zh: self.term_zh,
            explanation: self.explanation,
            examples: self.examples,
            image_url: None,
            category: self.category,
            saved,
            user_notes: None,
        }
    }
}

/// A generated sentence before it has been given an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceDraft {
    pub content: String,
    pub category: String,
}

impl SentenceDraft {
    pub fn into_sentence(self) -> Sentence {
        Sentence {
            id: generated_id("gen_sent"),
            content: self.content,
            category: self.category,
            saved: false,
        }
    }
}

/// Provider output for a topic refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(default)]
    pub terms: Vec<TermDraft>,
    #[serde(default)]
    pub sentences: Vec<SentenceDraft>,
}

impl GeneratedContent {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.sentences.is_empty()
    }

    /// Assign fresh ids; every generated item starts unsaved.
    pub fn into_items(self) -> (Vec<Term>, Vec<Sentence>) {
        let terms = self.terms.into_iter().map(|t| t.into_term(false)).collect();
        let sentences = self
            .sentences
            .into_iter()
            .map(SentenceDraft::into_sentence)
            .collect();
        (terms, sentences)
    }
}

fn generated_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
