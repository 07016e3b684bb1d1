pub mod movie;
pub mod details;
pub mod watched;

pub use movie::SearchResult;
pub use details::{parse_rating, parse_runtime, MovieDetails};
pub use watched::WatchedRecord;

/// Placeholder the remote API uses for missing values
pub const NOT_AVAILABLE: &str = "N/A";
