pub mod traits;
pub mod omdb;
pub mod error;

pub use traits::MovieApi;
pub use error::SearchError;
pub use omdb::OmdbClient;
