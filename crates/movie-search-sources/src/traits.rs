use async_trait::async_trait;
use movie_search_models::{MovieDetails, SearchResult};
use crate::error::SearchError;

/// Remote movie database seen as a black box.
#[async_trait]
pub trait MovieApi: Send + Sync {
    fn source_name(&self) -> &str;

    /// Search by free text. Results keep the API's order.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// Fetch full details for one identifier.
    async fn details(&self, id: &str) -> Result<MovieDetails, SearchError>;
}
