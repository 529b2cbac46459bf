//! The four persisted BizLingo documents
//!
//! Keys (one whole JSON document each):
//! ```text
//! bizlingo_terms       # Array of all terms
//! bizlingo_sentences   # Array of all sentences
//! bizlingo_progress    # Streak and completion dates
//! bizlingo_daily_set   # The current daily set
//! ```
//!
//! Documents are wrapped as `{ "schemaVersion": 1, "data": ... }`. Bare
//! documents from before the envelope are read as version 0.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::kv::{KeyValueStore, Result};
use crate::vocab::models::{DailySet, Sentence, Term, UserProgress};
use crate::vocab::seed::{sample_sentences, sample_terms};

pub const SCHEMA_VERSION: u32 = 1;

pub const TERMS_KEY: &str = "bizlingo_terms";
pub const SENTENCES_KEY: &str = "bizlingo_sentences";
pub const PROGRESS_KEY: &str = "bizlingo_progress";
pub const DAILY_SET_KEY: &str = "bizlingo_daily_set";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a, T> {
    schema_version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    schema_version: u32,
    data: serde_json::Value,
}

/// Why a stored document could not be used
#[derive(Debug)]
enum DecodeError {
    Json(serde_json::Error),
    FutureVersion(u32),
}

fn decode<T: DeserializeOwned>(raw: &str) -> std::result::Result<T, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(DecodeError::Json)?;

    let is_envelope = value
        .as_object()
        .map_or(false, |o| o.contains_key("schemaVersion") && o.contains_key("data"));

    if is_envelope {
        let envelope: Envelope = serde_json::from_value(value).map_err(DecodeError::Json)?;
        if envelope.schema_version > SCHEMA_VERSION {
            return Err(DecodeError::FutureVersion(envelope.schema_version));
        }
        serde_json::from_value(envelope.data).map_err(DecodeError::Json)
    } else {
        serde_json::from_value(value).map_err(DecodeError::Json)
    }
}

/// Everything read at startup
#[derive(Debug, Clone, PartialEq)]
pub struct StoredState {
    pub terms: Vec<Term>,
    pub sentences: Vec<Sentence>,
    pub progress: UserProgress,
    pub daily_set: Option<DailySet>,
}

/// Typed access to the persisted documents over any key-value backend
pub struct VocabStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> VocabStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read a document. Missing, unreadable or unparsable documents yield
    /// `None`; the latter two are logged.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", key, e);
                return None;
            }
        };

        match decode(&raw) {
            Ok(value) => Some(value),
            Err(DecodeError::FutureVersion(v)) => {
                log::warn!(
                    "{} has schema version {} (supported: {}). Using defaults.",
                    key,
                    v,
                    SCHEMA_VERSION
                );
                None
            }
            Err(DecodeError::Json(e)) => {
                log::warn!("Failed to parse {}: {}. Using defaults.", key, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let envelope = EnvelopeRef {
            schema_version: SCHEMA_VERSION,
            data,
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        self.store.set(key, &json)?;
        log::debug!("Saved {}", key);
        Ok(())
    }

    pub fn load_terms(&self) -> Vec<Term> {
        self.read(TERMS_KEY).unwrap_or_else(sample_terms)
    }

    pub fn load_sentences(&self) -> Vec<Sentence> {
        self.read(SENTENCES_KEY).unwrap_or_else(sample_sentences)
    }

    pub fn load_progress(&self) -> UserProgress {
        self.read(PROGRESS_KEY).unwrap_or_default()
    }

    pub fn load_daily_set(&self) -> Option<DailySet> {
        self.read(DAILY_SET_KEY)
    }

    pub fn load_snapshot(&self) -> StoredState {
        StoredState {
            terms: self.load_terms(),
            sentences: self.load_sentences(),
            progress: self.load_progress(),
            daily_set: self.load_daily_set(),
        }
    }

    pub fn save_terms(&self, terms: &[Term]) -> Result<()> {
        self.write(TERMS_KEY, &terms)
    }

    pub fn save_sentences(&self, sentences: &[Sentence]) -> Result<()> {
        self.write(SENTENCES_KEY, &sentences)
    }

    pub fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        self.write(PROGRESS_KEY, progress)
    }

    pub fn save_daily_set(&self, daily_set: &DailySet) -> Result<()> {
        self.write(DAILY_SET_KEY, daily_set)
    }
}
