use serde::{Deserialize, Serialize};

/// One movie summary as returned by a search request.
///
/// Field names follow the remote API's casing so the search payload
/// deserializes directly into this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl SearchResult {
    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty() && self.poster != crate::NOT_AVAILABLE
    }
}
