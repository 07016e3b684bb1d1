use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable checked before the credentials file
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

const API_KEY: &str = "omdb_api_key";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn get_api_key(&self) -> Option<&String> {
        self.get(API_KEY).filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, key: String) {
        self.set(API_KEY.to_string(), key);
    }
}

/// Resolve the API key: environment first, then the credentials file.
///
/// Returns `None` when neither source has a non-empty key.
pub fn resolve_api_key(store: &CredentialStore) -> Option<String> {
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), store)
}

fn resolve_api_key_from(env_value: Option<String>, store: &CredentialStore) -> Option<String> {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        debug!("Using API key from {}", API_KEY_ENV);
        return Some(key.trim().to_string());
    }
    store.get_api_key().map(|k| k.trim().to_string())
}
