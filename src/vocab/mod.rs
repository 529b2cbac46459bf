//! Vocabulary library for BizLingo
//!
//! This module provides:
//! - Term, sentence and daily-set models
//! - The built-in sample library and topic pool
//! - Library search and saved-item views

pub mod models;
pub mod search;
pub mod seed;

pub use models::*;
