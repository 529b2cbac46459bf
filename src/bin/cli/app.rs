use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use bizlingo_lib::config::AppConfig;
use bizlingo_lib::provider::provider_from_config;
use bizlingo_lib::session::Session;
use bizlingo_lib::storage::{FileStore, VocabStorage};
use bizlingo_lib::vocab::models::{Sentence, Term};

/// Shared application state for CLI commands
pub struct App {
    pub session: Session<FileStore>,
}

impl App {
    /// Load config, open the data directory, and make sure today's set exists
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load(config_path).context("Failed to load config")?;

        let data_dir = config
            .resolve_data_dir()
            .context("Failed to get data directory")?;
        let store = FileStore::new(data_dir);
        store.init().context("Failed to initialize data directory")?;

        let provider = provider_from_config(&config.provider)
            .context("Failed to set up content provider")?;

        let session = Session::open(VocabStorage::new(store), Arc::from(provider), &config)
            .context("Failed to open session")?;

        Ok(Self { session })
    }

    pub fn term(&self, id: &str) -> Result<&Term> {
        self.session
            .find_term(id)
            .with_context(|| format!("No term with id '{}'", id))
    }

    pub fn sentence(&self, id: &str) -> Result<&Sentence> {
        self.session
            .find_sentence(id)
            .with_context(|| format!("No sentence with id '{}'", id))
    }
}
