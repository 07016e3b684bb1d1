pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{ApiConfig, Config, StorageConfig, DEFAULT_BASE_URL};
pub use credentials::{resolve_api_key, CredentialStore, API_KEY_ENV};
pub use paths::{base_path_override, PathManager};
