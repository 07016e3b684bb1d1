use serde::{Deserialize, Serialize};

/// Full details for a single movie, fetched by identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String, // e.g. "148 min"
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String, // e.g. "8.8"
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
}

impl MovieDetails {
    pub fn runtime_minutes(&self) -> u32 {
        parse_runtime(&self.runtime)
    }

    pub fn imdb_rating_value(&self) -> f32 {
        parse_rating(&self.imdb_rating)
    }
}

/// Parse an API runtime string ("148 min") into minutes. Unknown values are 0.
pub fn parse_runtime(raw: &str) -> u32 {
    raw.split_whitespace()
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Parse an API rating string ("8.8") into a 0-10 value. Unknown values are 0.
pub fn parse_rating(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => v.clamp(0.0, 10.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime() {
        assert_eq!(parse_runtime("148 min"), 148);
        assert_eq!(parse_runtime("90"), 90);
        assert_eq!(parse_runtime("N/A"), 0);
        assert_eq!(parse_runtime(""), 0);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("8.8"), 8.8);
        assert_eq!(parse_rating(" 7 "), 7.0);
        assert_eq!(parse_rating("N/A"), 0.0);
        assert_eq!(parse_rating("42"), 10.0);
    }

    #[test]
    fn test_deserialize_details() {
        let json = r#"{
            "Title":"Inception","Year":"2010","Rated":"PG-13","Released":"16 Jul 2010",
            "Runtime":"148 min","Genre":"Action, Sci-Fi","Director":"Christopher Nolan",
            "Actors":"Leonardo DiCaprio","Plot":"A thief...","Poster":"https://x/p.jpg",
            "imdbRating":"8.8","imdbID":"tt1375666","Response":"True"
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, "tt1375666");
        assert_eq!(details.runtime_minutes(), 148);
        assert_eq!(details.imdb_rating_value(), 8.8);
        assert_eq!(details.director, "Christopher Nolan");
    }
}
