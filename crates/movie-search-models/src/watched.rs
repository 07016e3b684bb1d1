use serde::{Deserialize, Serialize};
use crate::details::MovieDetails;

/// A movie the user has marked as watched, with their own rating.
///
/// Records are immutable once created; the persisted JSON uses camelCase
/// names with the identifier stored as `imdbID`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedRecord {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    pub runtime: u32,         // minutes
    pub imdb_rating: f32,     // 0-10
    pub user_rating: f32,     // 0-10, entered when added
}

impl WatchedRecord {
    /// Build the record added from a detail view.
    pub fn from_details(details: &MovieDetails, user_rating: f32) -> Self {
        Self {
            id: details.id.clone(),
            title: details.title.clone(),
            year: details.year.clone(),
            poster: details.poster.clone(),
            runtime: details.runtime_minutes(),
            imdb_rating: details.imdb_rating_value(),
            user_rating,
        }
    }
}
