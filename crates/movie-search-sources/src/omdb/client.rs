use crate::error::SearchError;
use crate::omdb::api;
use crate::traits::MovieApi;
use async_trait::async_trait;
use movie_search_models::{MovieDetails, SearchResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Create the shared reqwest client with a request timeout
pub fn create_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Arc::new(create_client(timeout)),
            base_url,
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // Without a key the request still goes out; the API rejects it with a
    // non-success status, which surfaces as a transport failure.
    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        debug!(query, "Searching movies");
        api::search(&self.client, &self.base_url, self.api_key(), query).await
    }

    async fn details(&self, id: &str) -> Result<MovieDetails, SearchError> {
        debug!(id, "Fetching movie details");
        api::get_details(&self.client, &self.base_url, self.api_key(), id).await
    }
}
