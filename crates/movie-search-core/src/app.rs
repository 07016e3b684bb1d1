//! Composition root for the search subsystem.
//!
//! Owns the query, forwards user events to the fetch pipeline, selection and
//! watched list, and derives what the presentation layer should show.

use crate::fetch::{FetchController, FetchState};
use crate::selection::{SelectionState, SelectionStateMachine};
use crate::watched::{AddOutcome, WatchedError, WatchedListStore};
use movie_search_models::{MovieDetails, SearchResult, WatchedRecord};
use movie_search_sources::SearchError;
use tokio::sync::watch;
use tracing::debug;

/// Snapshot of everything a presentation layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub show_loader: bool,
    pub show_results: bool,
    pub show_error: bool,
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
    pub selected_id: Option<String>,
    pub watched: Vec<WatchedRecord>,
}

/// The selected id resolved against the collections that currently hold it
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedMovie {
    Result(SearchResult),
    Watched(WatchedRecord),
}

impl SelectedMovie {
    pub fn title(&self) -> &str {
        match self {
            SelectedMovie::Result(movie) => &movie.title,
            SelectedMovie::Watched(record) => &record.title,
        }
    }
}

/// Readers see only the fetch state the controller has observed.
pub struct AppController {
    query: String,
    fetch: FetchController,
    fetch_rx: watch::Receiver<FetchState>,
    observed: FetchState,
    selection: SelectionStateMachine,
    watched: WatchedListStore,
}

impl AppController {
    pub fn new(fetch: FetchController, watched: WatchedListStore) -> Self {
        let mut fetch_rx = fetch.subscribe();
        let observed = fetch_rx.borrow_and_update().clone();
        Self {
            query: String::new(),
            fetch,
            fetch_rx,
            observed,
            selection: SelectionStateMachine::new(),
            watched,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query. An unchanged query does not re-issue the search.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.selection.close();
        self.fetch.search(&self.query);
        self.apply_pending_fetch_update();
    }

    /// Result-item click. Pending fetch transitions are applied first.
    pub fn select(&mut self, id: &str) -> SelectionState {
        self.apply_pending_fetch_update();
        self.selection.select(id)
    }

    pub fn close_details(&mut self) {
        self.selection.close();
    }

    /// Add a watched record, then close the detail view.
    ///
    /// The detail view stays open when the record fails validation.
    pub fn add_watched(&mut self, record: WatchedRecord) -> Result<AddOutcome, WatchedError> {
        let outcome = self.watched.add(record)?;
        self.selection.close();
        Ok(outcome)
    }

    pub fn add_watched_from_details(
        &mut self,
        details: &MovieDetails,
        user_rating: f32,
    ) -> Result<AddOutcome, WatchedError> {
        self.add_watched(WatchedRecord::from_details(details, user_rating))
    }

    pub fn delete_watched(&mut self, id: &str) -> bool {
        self.watched.remove(id)
    }

    /// The user's own rating when `id` is already watched
    pub fn watched_user_rating(&self, id: &str) -> Option<f32> {
        self.watched.get(id).map(|record| record.user_rating)
    }

    /// The last fetch state this controller observed
    pub fn fetch_state(&self) -> FetchState {
        self.observed.clone()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn watched(&self) -> &WatchedListStore {
        &self.watched
    }

    /// Wait for the next fetch transition and apply it.
    ///
    /// Returns `None` once the fetch pipeline is gone.
    pub async fn next_fetch_update(&mut self) -> Option<FetchState> {
        self.fetch_rx.changed().await.ok()?;
        Some(self.observe_fetch_state())
    }

    /// Apply a fetch transition that already happened, if any.
    pub fn apply_pending_fetch_update(&mut self) -> Option<FetchState> {
        match self.fetch_rx.has_changed() {
            Ok(true) => Some(self.observe_fetch_state()),
            _ => None,
        }
    }

    // Fresh results replace the list, so any open detail view is stale.
    fn observe_fetch_state(&mut self) -> FetchState {
        let state = self.fetch_rx.borrow_and_update().clone();
        if matches!(state, FetchState::Success(_)) {
            debug!("New results landed, closing detail view");
            self.selection.close();
        }
        self.observed = state.clone();
        state
    }

    pub fn view(&self) -> ViewState {
        let state = &self.observed;
        let has_query = !self.query.is_empty();
        ViewState {
            query: self.query.clone(),
            show_loader: has_query && matches!(state, FetchState::Loading),
            show_results: has_query && matches!(state, FetchState::Success(_)),
            show_error: has_query && matches!(state, FetchState::Failure(_)),
            results: state.results().to_vec(),
            error: state.error().map(str::to_string),
            selected_id: self.selection.selected_id(),
            watched: self.watched.records(),
        }
    }

    /// Resolve the open id: current results first, then the watched list.
    pub fn selected_movie(&self) -> Option<SelectedMovie> {
        let id = self.selection.selected_id()?;
        if let Some(movie) = self.observed.results().iter().find(|m| m.id == id) {
            return Some(SelectedMovie::Result(movie.clone()));
        }
        self.watched.get(&id).map(SelectedMovie::Watched)
    }

    /// Fetch details for the open movie, if one is open.
    pub async fn selected_details(&self) -> Option<Result<MovieDetails, SearchError>> {
        let id = self.selection.selected_id()?;
        Some(self.fetch.details(&id).await)
    }

    pub fn shutdown(&self) {
        self.fetch.shutdown();
    }
}
