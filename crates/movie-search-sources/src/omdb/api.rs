use crate::error::SearchError;
use movie_search_models::{MovieDetails, SearchResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Search payload. `Search` is absent when `Response` is "False".
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search")]
    search: Option<Vec<SearchResult>>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Only the marker fields; the payload itself deserializes into `MovieDetails`.
#[derive(Debug, Deserialize)]
struct ResponseMarker {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn is_true(marker: &str) -> bool {
    marker.eq_ignore_ascii_case("true")
}

fn build_url(base_url: &str, api_key: &str, param: &str, value: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}apikey={}&{}={}",
        base_url,
        separator,
        urlencoding::encode(api_key),
        param,
        urlencoding::encode(value)
    )
}

/// `<base>?apikey=<key>&s=<query>` with both values URL-encoded
pub fn search_url(base_url: &str, api_key: &str, query: &str) -> String {
    build_url(base_url, api_key, "s", query)
}

/// `<base>?apikey=<key>&i=<id>`
pub fn details_url(base_url: &str, api_key: &str, id: &str) -> String {
    build_url(base_url, api_key, "i", id)
}

/// A "True" response without a `Search` array carries no results and is
/// reported as not found.
pub fn parse_search_body(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    match parsed.search {
        Some(results) if is_true(&parsed.response) => Ok(results),
        _ => Err(SearchError::NotFound(
            parsed.error.unwrap_or_else(|| "Movie not found!".to_string()),
        )),
    }
}

pub fn parse_details_body(body: &str) -> Result<MovieDetails, SearchError> {
    let marker: ResponseMarker = serde_json::from_str(body)?;
    if !is_true(&marker.response) {
        return Err(SearchError::NotFound(
            marker.error.unwrap_or_else(|| "Incorrect IMDb ID.".to_string()),
        ));
    }
    Ok(serde_json::from_str(body)?)
}

async fn get_body(client: &Client, url: &str) -> Result<String, SearchError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "Movie API returned non-success status");
        return Err(SearchError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}

/// Search movies by free text
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, SearchError> {
    let body = get_body(client, &search_url(base_url, api_key, query)).await?;
    parse_search_body(&body)
}

/// Fetch full details for one movie
pub async fn get_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetails, SearchError> {
    let body = get_body(client, &details_url(base_url, api_key, id)).await?;
    parse_details_body(&body)
}
