//! The session owns application state and everything with side effects:
//! storage, the provider, the clock, and the random source.
//!
//! Every change goes through [`Session::dispatch`], which runs the reducer
//! and then writes whichever records it marked dirty.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::AppConfig;
use crate::daily::{generate_daily_set, pick_topic, TopicMatchPolicy};
use crate::provider::{ContentProvider, ProviderError, WebContext, LIBRARY_BATCH_SIZE};
use crate::storage::{KeyValueStore, StorageError, VocabStorage};
use crate::vocab::models::{DailySet, GeneratedContent, ItemKind, Sentence, Term, TermDraft};

use super::state::{reduce, Action, AppState, Dirty, Event, RefreshTicket, View};

pub const EXPLANATION_UNAVAILABLE: &str = "AI explanation unavailable (Missing Key).";
pub const EXPLANATION_FAILED: &str = "Error generating explanation.";
pub const EXPLANATION_EMPTY: &str = "No explanation generated.";
pub const WEB_SEARCH_UNAVAILABLE: &str = "API Key missing.";
pub const WEB_SEARCH_FAILED: &str = "Error searching web.";
pub const WEB_SEARCH_EMPTY: &str = "No results found.";
pub const VARIATIONS_UNAVAILABLE: &str = "API Key missing.";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Source of "today" in local time
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The provider's items became the daily set
    Generated { terms: usize, sentences: usize },
    /// The provider gave nothing; the set was drawn from the library
    FellBack,
    /// Another refresh was already running
    AlreadyRefreshing,
    /// A newer refresh replaced this one before it finished
    Superseded,
}

pub struct Session<S: KeyValueStore> {
    storage: VocabStorage<S>,
    provider: Arc<dyn ContentProvider>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    policy: TopicMatchPolicy,
    topics: Vec<String>,
    state: AppState,
}

impl<S: KeyValueStore> Session<S> {
    /// Load persisted state, making sure there is a daily set for today
    pub fn open(
        storage: VocabStorage<S>,
        provider: Arc<dyn ContentProvider>,
        config: &AppConfig,
    ) -> Result<Self> {
        Self::open_with(storage, provider, config, Box::new(LocalClock), StdRng::from_entropy())
    }

    pub fn open_with(
        storage: VocabStorage<S>,
        provider: Arc<dyn ContentProvider>,
        config: &AppConfig,
        clock: Box<dyn Clock>,
        rng: StdRng,
    ) -> Result<Self> {
        let state = AppState::from_stored(storage.load_snapshot());
        let mut session = Self {
            storage,
            provider,
            clock,
            rng,
            policy: config.topic_match,
            topics: config.topics.clone(),
            state,
        };
        session.ensure_today()?;
        Ok(session)
    }

    fn ensure_today(&mut self) -> Result<()> {
        let today = self.clock.today();
        if self.state.daily_set.as_ref().is_some_and(|d| d.is_for(today)) {
            log::debug!("Keeping daily set for {}", today);
            return Ok(());
        }

        let topic = pick_topic(&self.topics, &mut self.rng);
        log::info!("Generating daily set for {} on topic {:?}", today, topic);
        let daily_set = generate_daily_set(
            today,
            &topic,
            &self.state.terms,
            &self.state.sentences,
            self.policy,
            &mut self.rng,
        );
        self.dispatch(Action::ReplaceDailySet(daily_set))?;
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn daily_set(&self) -> Option<&DailySet> {
        self.state.daily_set.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Shared handle for callers that run provider calls outside the session
    pub fn provider(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.provider)
    }

    pub fn storage(&self) -> &VocabStorage<S> {
        &self.storage
    }

    /// Reduce, then write the dirty records in a fixed order
    pub fn dispatch(&mut self, action: Action) -> Result<Option<Event>> {
        let current = std::mem::take(&mut self.state);
        let transition = reduce(current, action, self.policy, &mut self.rng);
        self.state = transition.state;
        self.persist(transition.dirty)?;
        Ok(transition.event)
    }

    fn persist(&self, dirty: Dirty) -> Result<()> {
        if dirty.contains(Dirty::TERMS) {
            self.storage.save_terms(&self.state.terms)?;
        }
        if dirty.contains(Dirty::SENTENCES) {
            self.storage.save_sentences(&self.state.sentences)?;
        }
        if dirty.contains(Dirty::PROGRESS) {
            self.storage.save_progress(&self.state.progress)?;
        }
        if dirty.contains(Dirty::DAILY_SET) {
            if let Some(daily_set) = &self.state.daily_set {
                self.storage.save_daily_set(daily_set)?;
            }
        }
        Ok(())
    }

    pub fn navigate(&mut self, view: View) -> Result<()> {
        self.dispatch(Action::Navigate(view))?;
        Ok(())
    }

    /// Flip the saved flag on a library item. `None` when the id is unknown.
    pub fn toggle_save(&mut self, kind: ItemKind, id: &str) -> Result<Option<bool>> {
        let event = self.dispatch(Action::ToggleSave {
            kind,
            id: id.to_string(),
        })?;
        Ok(match event {
            Some(Event::Toggled { saved }) => Some(saved),
            _ => None,
        })
    }

    /// Save every item in today's set. Returns how many library items were marked.
    pub fn save_all_daily(&mut self) -> Result<usize> {
        Ok(match self.dispatch(Action::SaveAllDaily)? {
            Some(Event::SavedAll { count }) => count,
            _ => 0,
        })
    }

    /// Add a generated term to the library, already saved
    pub fn add_generated_term(&mut self, draft: TermDraft) -> Result<Term> {
        let term = draft.into_term(true);
        self.dispatch(Action::AddGeneratedTerm(term.clone()))?;
        log::info!("Added generated term {:?}", term.term_en);
        Ok(term)
    }

    /// Mark today's set complete. `false` when it already was.
    pub fn complete_daily(&mut self) -> Result<bool> {
        let today = self.clock.today();
        Ok(matches!(
            self.dispatch(Action::CompleteDaily { today })?,
            Some(Event::Completed)
        ))
    }

    /// Replace today's set with new content on `topic`, or a library draw if
    /// the provider has nothing.
    ///
    /// The refresh slot is only claimed once the provider has answered, so
    /// dropping this future mid-call leaves no refresh outstanding.
    pub async fn refresh_daily(&mut self, topic: &str) -> Result<RefreshOutcome> {
        if self.state.is_refreshing() {
            log::warn!("Refresh requested while another is running; ignoring");
            return Ok(RefreshOutcome::AlreadyRefreshing);
        }
        let topic = topic.trim();
        let content = fetch_daily_content(self.provider.as_ref(), topic).await;

        let Some(ticket) = self.begin_refresh(topic)? else {
            return Ok(RefreshOutcome::AlreadyRefreshing);
        };
        self.finish_refresh(ticket.id, content)
    }

    /// Claim the refresh slot. `None` while another refresh is running.
    pub fn begin_refresh(&mut self, topic: &str) -> Result<Option<RefreshTicket>> {
        let today = self.clock.today();
        match self.dispatch(Action::BeginRefresh {
            topic: topic.trim().to_string(),
            today,
        })? {
            Some(Event::RefreshStarted(ticket)) => {
                log::info!("Refreshing daily set on topic {:?}", ticket.topic);
                Ok(Some(ticket))
            }
            _ => {
                log::warn!("Refresh requested while another is running; ignoring");
                Ok(None)
            }
        }
    }

    pub fn finish_refresh(
        &mut self,
        ticket_id: u64,
        content: GeneratedContent,
    ) -> Result<RefreshOutcome> {
        let (terms, sentences) = content.into_items();
        let event = self.dispatch(Action::FinishRefresh {
            ticket_id,
            terms,
            sentences,
        })?;
        Ok(match event {
            Some(Event::RefreshGenerated { terms, sentences }) => {
                log::info!(
                    "Daily set replaced with {} new terms and {} new sentences",
                    terms,
                    sentences
                );
                RefreshOutcome::Generated { terms, sentences }
            }
            Some(Event::RefreshFellBack) => {
                log::info!("Provider returned nothing; drew daily set from the library");
                RefreshOutcome::FellBack
            }
            _ => {
                log::debug!("Dropping result of superseded refresh {}", ticket_id);
                RefreshOutcome::Superseded
            }
        })
    }

    /// Give up the refresh slot without changing the daily set
    pub fn abandon_refresh(&mut self, ticket_id: u64) -> Result<()> {
        self.dispatch(Action::AbandonRefresh { ticket_id })?;
        Ok(())
    }

    /// Fetch a resource for today's set if it has none. Returns whether one
    /// was attached.
    pub async fn ensure_resource(&mut self) -> Result<bool> {
        if self.state.is_refreshing() {
            return Ok(false);
        }
        let (date, topic) = match &self.state.daily_set {
            Some(daily) if daily.resource.is_none() => (daily.date, daily.topic.clone()),
            _ => return Ok(false),
        };

        let resource = match self.provider.recommend_resource(&topic).await {
            Ok(Some(resource)) => resource,
            Ok(None) => {
                log::info!("No resource found for {:?}", topic);
                return Ok(false);
            }
            Err(e) => {
                log::warn!("Resource lookup failed: {}", e);
                return Ok(false);
            }
        };

        Ok(matches!(
            self.dispatch(Action::ResourceFetched { date, topic, resource })?,
            Some(Event::ResourceAttached)
        ))
    }

    /// Look a term up in the library, then in today's set
    pub fn find_term(&self, id: &str) -> Option<&Term> {
        self.state
            .find_term(id)
            .or_else(|| self.daily_set()?.terms().find(|t| t.id == id))
    }

    pub fn find_sentence(&self, id: &str) -> Option<&Sentence> {
        self.state
            .find_sentence(id)
            .or_else(|| self.daily_set()?.sentences().find(|s| s.id == id))
    }

    /// Plain-language explanation of a term. `None` when the id is unknown.
    pub async fn explain_term(&self, id: &str) -> Option<String> {
        let term = self.find_term(id)?.term_en.clone();
        let text = match self.provider.explain_term(&term).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(ProviderError::EmptyResponse) => EXPLANATION_EMPTY.to_string(),
            Err(ProviderError::MissingApiKey) => EXPLANATION_UNAVAILABLE.to_string(),
            Err(e) => {
                log::warn!("Explanation for {:?} failed: {}", term, e);
                EXPLANATION_FAILED.to_string()
            }
        };
        Some(text)
    }

    /// Professional rewrites of a sentence. A single notice when no key is
    /// configured, empty when the provider fails.
    pub async fn sentence_variations(&self, id: &str) -> Option<Vec<String>> {
        let content = self.find_sentence(id)?.content.clone();
        let variations = match self.provider.sentence_variations(&content).await {
            Ok(variations) => variations,
            Err(ProviderError::MissingApiKey) => vec![VARIATIONS_UNAVAILABLE.to_string()],
            Err(e) => {
                log::warn!("Sentence variations failed: {}", e);
                Vec::new()
            }
        };
        Some(variations)
    }

    /// Real-world context for a term from a grounded web search
    pub async fn search_web(&self, id: &str) -> Option<WebContext> {
        let term = self.find_term(id)?.term_en.clone();
        let context = match self.provider.search_web(&term).await {
            Ok(context) if context.text.trim().is_empty() => WebContext {
                text: WEB_SEARCH_EMPTY.to_string(),
                links: context.links,
            },
            Ok(context) => context,
            Err(ProviderError::EmptyResponse) => WebContext {
                text: WEB_SEARCH_EMPTY.to_string(),
                links: Vec::new(),
            },
            Err(ProviderError::MissingApiKey) => WebContext {
                text: WEB_SEARCH_UNAVAILABLE.to_string(),
                links: Vec::new(),
            },
            Err(e) => {
                log::warn!("Web search for {:?} failed: {}", term, e);
                WebContext {
                    text: WEB_SEARCH_FAILED.to_string(),
                    links: Vec::new(),
                }
            }
        };
        Some(context)
    }

    /// Candidate terms for the library generator. Nothing is added until
    /// [`Session::add_generated_term`] is called.
    pub async fn generate_terms(&self, topic: &str) -> Vec<TermDraft> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Vec::new();
        }
        match self.provider.generate_terms(topic, LIBRARY_BATCH_SIZE).await {
            Ok(drafts) => drafts,
            Err(e) => {
                log::warn!("Term generation for {:?} failed: {}", topic, e);
                Vec::new()
            }
        }
    }
}

/// Provider content for a refresh; any failure reads as "nothing"
pub async fn fetch_daily_content(provider: &dyn ContentProvider, topic: &str) -> GeneratedContent {
    match provider.generate_daily_content(topic).await {
        Ok(content) => content,
        Err(e) => {
            log::warn!("{} could not generate content for {:?}: {}", provider.name(), topic, e);
            GeneratedContent::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Result as ProviderResult, SourceLink};
    use crate::storage::{MemoryStore, DAILY_SET_KEY, PROGRESS_KEY, TERMS_KEY};
    use crate::vocab::models::{DailyResource, ResourceKind, SentenceDraft};
    use crate::vocab::seed::{sample_sentences, sample_terms};
    use crate::provider::UnconfiguredProvider;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Provider that replays canned answers and counts calls
    #[derive(Default)]
    struct ScriptedProvider {
        daily: Option<GeneratedContent>,
        resource: Option<DailyResource>,
        explanation: Option<String>,
        web_text: Option<String>,
        /// How long daily content takes to arrive
        delay: Option<Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate_terms(
            &self,
            topic: &str,
            count: usize,
        ) -> ProviderResult<Vec<TermDraft>> {
            self.record("generate_terms");
            Ok((0..count.min(2))
                .map(|i| TermDraft {
                    term_en: format!("{} term {}", topic, i),
                    term_zh: "术语".to_string(),
                    explanation: "Generated.".to_string(),
                    examples: vec!["Example.".to_string()],
                    category: topic.to_string(),
                })
                .collect())
        }

        async fn generate_daily_content(&self, _topic: &str) -> ProviderResult<GeneratedContent> {
            self.record("generate_daily_content");
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.daily.clone().ok_or(ProviderError::EmptyResponse)
        }

        async fn recommend_resource(&self, _topic: &str) -> ProviderResult<Option<DailyResource>> {
            self.record("recommend_resource");
            Ok(self.resource.clone())
        }

        async fn explain_term(&self, _term: &str) -> ProviderResult<String> {
            self.explanation.clone().ok_or(ProviderError::MissingApiKey)
        }

        async fn sentence_variations(&self, _sentence: &str) -> ProviderResult<Vec<String>> {
            Err(ProviderError::MalformedResponse("not a list".to_string()))
        }

        async fn search_web(&self, term: &str) -> ProviderResult<WebContext> {
            Ok(WebContext {
                text: self.web_text.clone().unwrap_or_else(|| format!("{} in the news", term)),
                links: vec![SourceLink {
                    title: "News".to_string(),
                    url: "https://example.com/news".to_string(),
                }],
            })
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn config() -> AppConfig {
        AppConfig {
            topics: vec!["Meetings".to_string()],
            ..AppConfig::default()
        }
    }

    fn open(
        store: MemoryStore,
        provider: Arc<ScriptedProvider>,
        today: NaiveDate,
    ) -> Session<MemoryStore> {
        Session::open_with(
            VocabStorage::new(store),
            provider,
            &config(),
            Box::new(FixedClock(today)),
            StdRng::seed_from_u64(3),
        )
        .unwrap()
    }

    /// Reopen against the same persisted documents
    fn reopen(
        session: &Session<MemoryStore>,
        provider: Arc<ScriptedProvider>,
        today: NaiveDate,
    ) -> Session<MemoryStore> {
        let store = MemoryStore::new();
        for key in [TERMS_KEY, crate::storage::SENTENCES_KEY, PROGRESS_KEY, DAILY_SET_KEY] {
            if let Some(value) = session.storage().store().get(key).unwrap() {
                store.set(key, &value).unwrap();
            }
        }
        open(store, provider, today)
    }

    fn generated(terms: usize, sentences: usize) -> GeneratedContent {
        GeneratedContent {
            terms: (0..terms)
                .map(|i| TermDraft {
                    term_en: format!("Anchor price {}", i),
                    term_zh: "锚定价格".to_string(),
                    explanation: "The first number named.".to_string(),
                    examples: vec!["They anchored at ten.".to_string()],
                    category: "Negotiation".to_string(),
                })
                .collect(),
            sentences: (0..sentences)
                .map(|i| SentenceDraft {
                    content: format!("Let's find common ground {}.", i),
                    category: "Negotiation".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_first_open_seeds_library_and_daily_set() {
        let session = open(MemoryStore::new(), Arc::new(ScriptedProvider::default()), day(1));

        assert_eq!(session.state().terms, sample_terms());
        assert_eq!(session.state().sentences, sample_sentences());
        let daily = session.daily_set().unwrap();
        assert_eq!(daily.date, day(1));
        assert_eq!(daily.topic, "Meetings");
        assert_eq!(daily.items.len(), 5);
        assert!(session.storage().store().get(DAILY_SET_KEY).unwrap().is_some());
    }

    #[test]
    fn test_same_day_reload_keeps_set_and_next_day_regenerates() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut session = open(MemoryStore::new(), provider.clone(), day(1));
        session.complete_daily().unwrap();
        let first = session.daily_set().cloned().unwrap();

        let same_day = reopen(&session, provider.clone(), day(1));
        assert_eq!(same_day.daily_set(), Some(&first));

        let next_day = reopen(&session, provider, day(2));
        let fresh = next_day.daily_set().unwrap();
        assert_eq!(fresh.date, day(2));
        assert!(!fresh.completed);
        assert_eq!(next_day.state().progress.streak, 1);
    }

    #[tokio::test]
    async fn test_refresh_with_generated_content() {
        let provider = Arc::new(ScriptedProvider {
            daily: Some(generated(3, 2)),
            ..ScriptedProvider::default()
        });
        let mut session = open(MemoryStore::new(), provider.clone(), day(4));

        let outcome = session.refresh_daily("Negotiation").await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Generated { terms: 3, sentences: 2 });
        let daily = session.daily_set().unwrap();
        assert_eq!(daily.topic, "Negotiation");
        assert_eq!(daily.items.len(), 5);
        assert!(!daily.completed);
        assert!(daily.resource.is_none());

        let state = session.state();
        assert_eq!(state.terms.len(), 8 + 3);
        assert_eq!(state.sentences.len(), 6 + 2);
        for term in daily.terms() {
            assert!(term.id.starts_with("gen_term_"));
            assert!(state.find_term(&term.id).is_some());
        }
        for sentence in daily.sentences() {
            assert!(sentence.id.starts_with("gen_sent_"));
            assert!(state.find_sentence(&sentence.id).is_some());
        }
        assert!(!state.is_refreshing());

        let reloaded = reopen(&session, provider, day(4));
        assert_eq!(reloaded.state().terms.len(), 11);
        assert_eq!(reloaded.daily_set(), session.daily_set());
    }

    #[tokio::test]
    async fn test_refresh_with_failing_provider_falls_back() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut session = open(MemoryStore::new(), provider.clone(), day(4));

        let outcome = session.refresh_daily("Finance").await.unwrap();

        assert_eq!(outcome, RefreshOutcome::FellBack);
        assert_eq!(session.state().terms, sample_terms());
        assert_eq!(session.state().sentences, sample_sentences());
        let daily = session.daily_set().unwrap();
        assert_eq!(daily.topic, "Finance");
        assert_eq!(daily.items.len(), 5);
        assert_eq!(provider.calls(), vec!["generate_daily_content"]);
    }

    #[tokio::test]
    async fn test_split_refresh_guards_against_overlap() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut session = open(MemoryStore::new(), provider, day(4));
        let before = session.daily_set().cloned();

        let first = session.begin_refresh("Sales").unwrap().unwrap();
        assert!(session.begin_refresh("HR").unwrap().is_none());
        assert_eq!(session.refresh_daily("HR").await.unwrap(), RefreshOutcome::AlreadyRefreshing);

        session.abandon_refresh(first.id).unwrap();
        let second = session.begin_refresh("Marketing").unwrap().unwrap();

        let late = session.finish_refresh(first.id, generated(1, 0)).unwrap();
        assert_eq!(late, RefreshOutcome::Superseded);
        assert_eq!(session.daily_set().cloned(), before);
        assert_eq!(session.state().terms.len(), 8);

        let done = session.finish_refresh(second.id, generated(0, 1)).unwrap();
        assert_eq!(done, RefreshOutcome::Generated { terms: 0, sentences: 1 });
        assert_eq!(session.daily_set().unwrap().topic, "Marketing");
    }

    #[tokio::test]
    async fn test_ensure_resource_attaches_once() {
        let provider = Arc::new(ScriptedProvider {
            resource: Some(DailyResource {
                title: "Meeting Mastery".to_string(),
                url: "https://example.com/ep1".to_string(),
                kind: ResourceKind::Podcast,
                summary: "Run shorter meetings.".to_string(),
            }),
            ..ScriptedProvider::default()
        });
        let mut session = open(MemoryStore::new(), provider.clone(), day(6));

        assert!(session.ensure_resource().await.unwrap());
        assert!(!session.ensure_resource().await.unwrap());

        assert_eq!(provider.calls(), vec!["recommend_resource"]);
        let resource = session.daily_set().unwrap().resource.as_ref().unwrap();
        assert_eq!(resource.kind, ResourceKind::Podcast);
    }

    #[tokio::test]
    async fn test_ensure_resource_without_result_leaves_set_alone() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut session = open(MemoryStore::new(), provider, day(6));
        let before = session.daily_set().cloned();

        assert!(!session.ensure_resource().await.unwrap());
        assert_eq!(session.daily_set().cloned(), before);
    }

    #[test]
    fn test_complete_daily_is_idempotent_and_persisted() {
        let mut session = open(MemoryStore::new(), Arc::new(ScriptedProvider::default()), day(9));

        assert!(session.complete_daily().unwrap());
        assert!(!session.complete_daily().unwrap());

        let progress = session.storage().load_progress();
        assert_eq!(progress.streak, 1);
        assert_eq!(progress.completed_dates, vec![day(9)]);
        assert!(session.storage().load_daily_set().unwrap().completed);
    }

    #[test]
    fn test_toggle_and_save_all_persist() {
        let mut session = open(MemoryStore::new(), Arc::new(ScriptedProvider::default()), day(9));

        assert_eq!(session.toggle_save(ItemKind::Term, "t2").unwrap(), Some(true));
        assert_eq!(session.toggle_save(ItemKind::Term, "t2").unwrap(), Some(false));
        assert_eq!(session.toggle_save(ItemKind::Term, "nope").unwrap(), None);

        let count = session.save_all_daily().unwrap();
        assert_eq!(count, 5);
        let stored = session.storage().load_terms();
        for term in session.daily_set().unwrap().terms() {
            assert!(stored.iter().any(|t| t.id == term.id && t.saved));
        }
    }

    #[tokio::test]
    async fn test_generated_term_is_added_saved() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut session = open(MemoryStore::new(), provider, day(9));

        let drafts = session.generate_terms("Logistics").await;
        assert_eq!(drafts.len(), 2);
        assert!(session.generate_terms("  ").await.is_empty());

        let term = session.add_generated_term(drafts[0].clone()).unwrap();
        assert!(term.saved);
        assert_eq!(session.state().terms.last(), Some(&term));
        assert!(session.storage().load_terms().iter().any(|t| t.id == term.id));
    }

    #[tokio::test]
    async fn test_assist_calls_fall_back_to_messages() {
        let session = open(MemoryStore::new(), Arc::new(ScriptedProvider::default()), day(9));

        assert_eq!(session.explain_term("t1").await.as_deref(), Some(EXPLANATION_UNAVAILABLE));
        assert_eq!(session.explain_term("missing").await, None);
        assert_eq!(session.sentence_variations("s1").await, Some(Vec::new()));

        let context = session.search_web("t1").await.unwrap();
        assert_eq!(context.text, "Deliverable in the news");
        assert_eq!(context.links.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_explanation_uses_placeholder() {
        let provider = Arc::new(ScriptedProvider {
            explanation: Some("   ".to_string()),
            ..ScriptedProvider::default()
        });
        let session = open(MemoryStore::new(), provider, day(9));

        assert_eq!(session.explain_term("t1").await.as_deref(), Some(EXPLANATION_EMPTY));
    }

    #[tokio::test]
    async fn test_cancelled_refresh_leaves_no_refresh_outstanding() {
        let provider = Arc::new(ScriptedProvider {
            daily: Some(generated(3, 2)),
            delay: Some(Duration::from_secs(5)),
            ..ScriptedProvider::default()
        });
        let mut session = open(MemoryStore::new(), provider, day(4));
        let before = session.daily_set().cloned();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(50), session.refresh_daily("Sales")).await;

        assert!(timed_out.is_err());
        assert!(!session.state().is_refreshing());
        assert_eq!(session.daily_set().cloned(), before);
        assert_eq!(session.state().terms.len(), 8);
        assert!(session.begin_refresh("Sales").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_web_result_uses_placeholder_and_keeps_links() {
        let provider = Arc::new(ScriptedProvider {
            web_text: Some("  ".to_string()),
            ..ScriptedProvider::default()
        });
        let session = open(MemoryStore::new(), provider, day(9));

        let context = session.search_web("t1").await.unwrap();
        assert_eq!(context.text, WEB_SEARCH_EMPTY);
        assert_eq!(context.links.len(), 1);
    }

    #[tokio::test]
    async fn test_assist_calls_without_api_key() {
        let session = Session::open_with(
            VocabStorage::new(MemoryStore::new()),
            Arc::new(UnconfiguredProvider),
            &config(),
            Box::new(FixedClock(day(9))),
            StdRng::seed_from_u64(3),
        )
        .unwrap();

        assert_eq!(
            session.sentence_variations("s1").await,
            Some(vec![VARIATIONS_UNAVAILABLE.to_string()])
        );
        assert_eq!(session.search_web("t1").await.unwrap().text, WEB_SEARCH_UNAVAILABLE);
        assert_eq!(session.explain_term("t1").await.as_deref(), Some(EXPLANATION_UNAVAILABLE));
    }
}
