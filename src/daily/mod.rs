//! Daily learning set for BizLingo
//!
//! This module provides:
//! - Topic-based selection of the daily set from the library
//! - Streak and completion tracking

pub mod progress;
pub mod selector;

pub use progress::complete_daily;
pub use selector::{
    generate_daily_set, pick_topic, TopicMatchPolicy, DAILY_SENTENCE_COUNT, DAILY_TERM_COUNT,
};
