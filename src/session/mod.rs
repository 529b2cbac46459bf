mod manager;
pub mod state;

pub use manager::{
    fetch_daily_content, Clock, FixedClock, LocalClock, RefreshOutcome, Result, Session,
    SessionError, EXPLANATION_EMPTY, EXPLANATION_FAILED, EXPLANATION_UNAVAILABLE,
    VARIATIONS_UNAVAILABLE, WEB_SEARCH_EMPTY, WEB_SEARCH_FAILED, WEB_SEARCH_UNAVAILABLE,
};
pub use state::{reduce, Action, AppState, Dirty, Event, RefreshTicket, Transition, View};
