//! Generative content provider
//!
//! The session asks a provider for new terms and sentences, a recommended
//! resource for the daily topic, and short on-demand texts (explanations,
//! rewrites, web context). Every call may fail; callers treat a failure as
//! "provider unavailable" and fall back to local content.

mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::vocab::models::{DailyResource, GeneratedContent, TermDraft};

pub use gemini::GeminiProvider;

/// Terms requested by a library generation
pub const LIBRARY_BATCH_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Provider returned no content")]
    EmptyResponse,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// A web page cited by a grounded answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// Real-world context for a term, with the pages it was drawn from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebContext {
    pub text: String,
    pub links: Vec<SourceLink>,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// A batch of terms for the library generator
    async fn generate_terms(&self, topic: &str, count: usize) -> Result<Vec<TermDraft>>;

    /// A small mixed set of terms and sentences for a topic refresh
    async fn generate_daily_content(&self, topic: &str) -> Result<GeneratedContent>;

    /// One podcast episode, video or article about the topic
    async fn recommend_resource(&self, topic: &str) -> Result<Option<DailyResource>>;

    /// A one-paragraph plain-language explanation of a term
    async fn explain_term(&self, term: &str) -> Result<String>;

    /// Two professional rewrites of a sentence
    async fn sentence_variations(&self, sentence: &str) -> Result<Vec<String>>;

    /// Grounded web summary for a term
    async fn search_web(&self, term: &str) -> Result<WebContext>;
}

/// Stand-in used when no API key is configured. Every call fails.
pub struct UnconfiguredProvider;

#[async_trait]
impl ContentProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn generate_terms(&self, _topic: &str, _count: usize) -> Result<Vec<TermDraft>> {
        Err(ProviderError::MissingApiKey)
    }

    async fn generate_daily_content(&self, _topic: &str) -> Result<GeneratedContent> {
        Err(ProviderError::MissingApiKey)
    }

    async fn recommend_resource(&self, _topic: &str) -> Result<Option<DailyResource>> {
        Err(ProviderError::MissingApiKey)
    }

    async fn explain_term(&self, _term: &str) -> Result<String> {
        Err(ProviderError::MissingApiKey)
    }

    async fn sentence_variations(&self, _sentence: &str) -> Result<Vec<String>> {
        Err(ProviderError::MissingApiKey)
    }

    async fn search_web(&self, _term: &str) -> Result<WebContext> {
        Err(ProviderError::MissingApiKey)
    }
}

/// The hosted provider when a key is configured, otherwise the stand-in
pub fn provider_from_config(config: &ProviderConfig) -> Result<Box<dyn ContentProvider>> {
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(Box::new(GeminiProvider::new(config)?)),
        _ => {
            log::info!("No API key configured; AI features are unavailable");
            Ok(Box::new(UnconfiguredProvider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_provider_always_fails() {
        let provider = UnconfiguredProvider;
        assert!(matches!(
            provider.generate_daily_content("Sales").await,
            Err(ProviderError::MissingApiKey)
        ));
        assert!(provider.recommend_resource("Sales").await.is_err());
    }

    #[test]
    fn test_provider_from_config_without_key() {
        let provider = provider_from_config(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "unconfigured");

        let blank = ProviderConfig {
            api_key: Some("   ".to_string()),
            ..ProviderConfig::default()
        };
        assert_eq!(provider_from_config(&blank).unwrap().name(), "unconfigured");
    }

    #[test]
    fn test_provider_from_config_with_key() {
        let config = ProviderConfig {
            api_key: Some("test-key".to_string()),
            ..ProviderConfig::default()
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
