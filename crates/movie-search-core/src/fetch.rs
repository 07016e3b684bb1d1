//! Cancellable search pipeline.
//!
//! Every call to [`FetchController::search`] supersedes the previous one:
//! the old request's token is cancelled and its generation retired under the
//! same lock that publishes results, so a stale response can never replace
//! the state produced by a newer query.

use movie_search_config::ApiConfig;
use movie_search_models::{MovieDetails, SearchResult};
use movie_search_sources::{MovieApi, SearchError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const FETCH_ERROR_MESSAGE: &str = "Something went wrong while fetching movies";
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    /// No query; nothing to show
    #[default]
    Idle,
    Loading,
    Success(Vec<SearchResult>),
    Failure(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn results(&self) -> &[SearchResult] {
        match self {
            FetchState::Success(results) => results,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message),
            _ => None,
        }
    }

    fn from_error(error: &SearchError) -> Self {
        if error.is_not_found() {
            FetchState::Failure(NOT_FOUND_MESSAGE.to_string())
        } else {
            FetchState::Failure(FETCH_ERROR_MESSAGE.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ApiConfig> for FetchSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
        }
    }
}

#[derive(Default)]
struct Inflight {
    generation: u64,
    token: Option<CancellationToken>,
}

struct Shared {
    inflight: Mutex<Inflight>,
    state_tx: watch::Sender<FetchState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inflight> {
        self.inflight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Publish a completed request's outcome if it is still the current one.
    fn publish(&self, generation: u64, token: &CancellationToken, next: FetchState) -> bool {
        let mut inflight = self.lock();
        if inflight.generation != generation || token.is_cancelled() {
            debug!(generation, "Dropping response from superseded request");
            return false;
        }
        inflight.token = None;
        self.state_tx.send_replace(next);
        true
    }
}

pub struct FetchController {
    api: Arc<dyn MovieApi>,
    settings: FetchSettings,
    shared: Arc<Shared>,
}

impl FetchController {
    pub fn new(api: Arc<dyn MovieApi>, settings: FetchSettings) -> Self {
        let (state_tx, _) = watch::channel(FetchState::Idle);
        Self {
            api,
            settings,
            shared: Arc::new(Shared {
                inflight: Mutex::new(Inflight::default()),
                state_tx,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.shared.state_tx.subscribe()
    }

    pub fn state(&self) -> FetchState {
        self.shared.state_tx.borrow().clone()
    }

    /// Start a search for `query`, superseding any request still in flight.
    ///
    /// An empty query publishes `Idle` without touching the network.
    /// Must be called from within a tokio runtime.
    pub fn search(&self, query: &str) {
        let mut inflight = self.shared.lock();
        Self::cancel_locked(&mut inflight);

        if query.is_empty() {
            self.shared.state_tx.send_replace(FetchState::Idle);
            return;
        }

        let token = CancellationToken::new();
        inflight.token = Some(token.clone());
        let generation = inflight.generation;
        self.shared.state_tx.send_replace(FetchState::Loading);
        drop(inflight);

        debug!(
            operation = "movie_search",
            source = self.api.source_name(),
            generation,
            query,
            "Issuing search request"
        );

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let timeout = self.settings.request_timeout;
        let query = query.to_string();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(generation, "Search request cancelled");
                    return;
                }
                outcome = tokio::time::timeout(timeout, api.search(&query)) => outcome,
            };

            let next = match outcome {
                Ok(Ok(results)) => {
                    debug!(operation = "movie_search", generation, count = results.len(), "Search completed");
                    FetchState::Success(results)
                }
                Ok(Err(e)) => {
                    warn!(operation = "movie_search", generation, error = %e, "Search failed");
                    FetchState::from_error(&e)
                }
                Err(_) => {
                    warn!(operation = "movie_search", generation, timeout_ms = timeout.as_millis() as u64, "Search timed out");
                    FetchState::from_error(&SearchError::Timeout(timeout))
                }
            };

            shared.publish(generation, &token, next);
        });
    }

    /// Fetch details for one movie, bounded by the request timeout.
    pub async fn details(&self, id: &str) -> Result<MovieDetails, SearchError> {
        let timeout = self.settings.request_timeout;
        match tokio::time::timeout(timeout, self.api.details(id)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(timeout)),
        }
    }

    /// Cancel whatever is in flight. The current state is left as is.
    pub fn shutdown(&self) {
        let mut inflight = self.shared.lock();
        Self::cancel_locked(&mut inflight);
    }

    fn cancel_locked(inflight: &mut Inflight) {
        if let Some(previous) = inflight.token.take() {
            previous.cancel();
        }
        inflight.generation += 1;
    }
}

impl Drop for FetchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests;
