//! Application state and the reducer that updates it
//!
//! `reduce` is a pure function of the current state, an action, and the
//! random source. It reports which persisted records changed through
//! [`Dirty`]; writing them is the session's job.

use bitflags::bitflags;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::daily::{complete_daily, generate_daily_set, TopicMatchPolicy};
use crate::storage::StoredState;
use crate::vocab::models::{
    DailyItem, DailyResource, DailySet, ItemKind, Sentence, Term, UserProgress,
};

/// Screen the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Daily,
    Library,
    Saved,
}

/// Marks the one refresh allowed in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub id: u64,
    pub topic: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub view: View,
    pub terms: Vec<Term>,
    pub sentences: Vec<Sentence>,
    pub daily_set: Option<DailySet>,
    pub progress: UserProgress,
    pub refresh: Option<RefreshTicket>,
    next_ticket_id: u64,
}

impl AppState {
    pub fn from_stored(stored: StoredState) -> Self {
        Self {
            view: View::default(),
            terms: stored.terms,
            sentences: stored.sentences,
            daily_set: stored.daily_set,
            progress: stored.progress,
            refresh: None,
            next_ticket_id: 1,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_some()
    }

    pub fn find_term(&self, id: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    pub fn find_sentence(&self, id: &str) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.id == id)
    }
}

bitflags! {
    /// Persisted records an action changed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u8 {
        const TERMS = 1;
        const SENTENCES = 1 << 1;
        const PROGRESS = 1 << 2;
        const DAILY_SET = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(View),
    ToggleSave { kind: ItemKind, id: String },
    SaveAllDaily,
    AddGeneratedTerm(Term),
    CompleteDaily { today: NaiveDate },
    ReplaceDailySet(DailySet),
    BeginRefresh { topic: String, today: NaiveDate },
    /// Generated items already carry their ids
    FinishRefresh {
        ticket_id: u64,
        terms: Vec<Term>,
        sentences: Vec<Sentence>,
    },
    AbandonRefresh { ticket_id: u64 },
    ResourceFetched {
        date: NaiveDate,
        topic: String,
        resource: DailyResource,
    },
}

/// What an action did, when the caller needs to know
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Toggled { saved: bool },
    SavedAll { count: usize },
    Completed,
    RefreshStarted(RefreshTicket),
    RefreshRejected,
    RefreshGenerated { terms: usize, sentences: usize },
    RefreshFellBack,
    StaleResultDropped,
    ResourceAttached,
}

#[derive(Debug)]
pub struct Transition {
    pub state: AppState,
    pub dirty: Dirty,
    pub event: Option<Event>,
}

impl Transition {
    fn unchanged(state: AppState) -> Self {
        Self {
            state,
            dirty: Dirty::empty(),
            event: None,
        }
    }
}

pub fn reduce<R: Rng + ?Sized>(
    mut state: AppState,
    action: Action,
    policy: TopicMatchPolicy,
    rng: &mut R,
) -> Transition {
    let mut dirty = Dirty::empty();
    let mut event = None;

    match action {
        Action::Navigate(view) => {
            state.view = view;
        }

        Action::ToggleSave { kind, id } => {
            let flipped = match kind {
                ItemKind::Term => state.terms.iter_mut().find(|t| t.id == id).map(|t| {
                    t.saved = !t.saved;
                    dirty |= Dirty::TERMS;
                    t.saved
                }),
                ItemKind::Sentence => state.sentences.iter_mut().find(|s| s.id == id).map(|s| {
                    s.saved = !s.saved;
                    dirty |= Dirty::SENTENCES;
                    s.saved
                }),
            };
            event = flipped.map(|saved| Event::Toggled { saved });
        }

        Action::SaveAllDaily => {
            let Some(daily) = &state.daily_set else {
                return Transition::unchanged(state);
            };
            let term_ids: Vec<String> = daily.terms().map(|t| t.id.clone()).collect();
            let sentence_ids: Vec<String> = daily.sentences().map(|s| s.id.clone()).collect();

            let mut count = 0;
            for term in state.terms.iter_mut().filter(|t| term_ids.contains(&t.id)) {
                term.saved = true;
                dirty |= Dirty::TERMS;
                count += 1;
            }
            for sentence in state.sentences.iter_mut().filter(|s| sentence_ids.contains(&s.id)) {
                sentence.saved = true;
                dirty |= Dirty::SENTENCES;
                count += 1;
            }
            event = Some(Event::SavedAll { count });
        }

        Action::AddGeneratedTerm(term) => {
            state.terms.push(term);
            dirty |= Dirty::TERMS;
        }

        Action::CompleteDaily { today } => {
            if let Some(daily) = state.daily_set.as_mut() {
                if complete_daily(&mut state.progress, daily, today) {
                    dirty |= Dirty::PROGRESS | Dirty::DAILY_SET;
                    event = Some(Event::Completed);
                }
            }
        }

        Action::ReplaceDailySet(daily_set) => {
            state.daily_set = Some(daily_set);
            dirty |= Dirty::DAILY_SET;
        }

        Action::BeginRefresh { topic, today } => {
            if state.refresh.is_some() {
                event = Some(Event::RefreshRejected);
            } else {
                let ticket = RefreshTicket {
                    id: state.next_ticket_id,
                    topic,
                    date: today,
                };
                state.next_ticket_id += 1;
                state.refresh = Some(ticket.clone());
                event = Some(Event::RefreshStarted(ticket));
            }
        }

        Action::FinishRefresh {
            ticket_id,
            terms,
            sentences,
        } => {
            let ticket = match state.refresh.take() {
                Some(ticket) if ticket.id == ticket_id => ticket,
                other => {
                    state.refresh = other;
                    event = Some(Event::StaleResultDropped);
                    return Transition { state, dirty, event };
                }
            };

            let daily_set = if terms.is_empty() && sentences.is_empty() {
                event = Some(Event::RefreshFellBack);
                generate_daily_set(
                    ticket.date,
                    &ticket.topic,
                    &state.terms,
                    &state.sentences,
                    policy,
                    rng,
                )
            } else {
                event = Some(Event::RefreshGenerated {
                    terms: terms.len(),
                    sentences: sentences.len(),
                });
                let items: Vec<DailyItem> = terms
                    .iter()
                    .cloned()
                    .map(DailyItem::Term)
                    .chain(sentences.iter().cloned().map(DailyItem::Sentence))
                    .collect();

                if !terms.is_empty() {
                    state.terms.extend(terms);
                    dirty |= Dirty::TERMS;
                }
                if !sentences.is_empty() {
                    state.sentences.extend(sentences);
                    dirty |= Dirty::SENTENCES;
                }
                DailySet::new(ticket.date, ticket.topic, items)
            };

            state.daily_set = Some(daily_set);
            dirty |= Dirty::DAILY_SET;
        }

        Action::AbandonRefresh { ticket_id } => {
            if state.refresh.as_ref().map(|t| t.id) == Some(ticket_id) {
                state.refresh = None;
            }
        }

        Action::ResourceFetched {
            date,
            topic,
            resource,
        } => match state.daily_set.as_mut() {
            Some(daily)
                if daily.date == date && daily.topic == topic && daily.resource.is_none() =>
            {
                daily.resource = Some(resource);
                dirty |= Dirty::DAILY_SET;
                event = Some(Event::ResourceAttached);
            }
            _ => {
                event = Some(Event::StaleResultDropped);
            }
        },
    }

    Transition { state, dirty, event }
}
