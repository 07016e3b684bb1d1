use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use movie_search_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

/// `config_file` is the file actually loaded, honouring `--config`.
pub fn run_config(
    cmd: crate::ConfigCommands,
    config: &Config,
    config_file: &PathBuf,
    path_manager: &PathManager,
    output: &Output,
) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, config, config_file, path_manager, output),
        crate::ConfigCommands::SetApiKey { key } => set_api_key(key, path_manager, output),
        crate::ConfigCommands::Init { force } => init_config(force, config_file, output),
    }
}

fn show_config(
    full: bool,
    config: &Config,
    config_file: &PathBuf,
    path_manager: &PathManager,
    output: &Output,
) -> Result<()> {
    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    let (key, key_source) = match std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
        Some(key) => (Some(key), API_KEY_ENV.to_string()),
        None => (cred_store.get_api_key().cloned(), "credentials file".to_string()),
    };
    let key_display = match &key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };
    let data_dir = path_manager.data_dir().display().to_string();

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Configuration").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
                Cell::new(""),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
            table.add_row(vec![Cell::new("API base URL"), Cell::new(&config.api.base_url)]);
            table.add_row(vec![Cell::new("Request timeout"), Cell::new(format!("{}s", config.api.request_timeout_secs))]);
            table.add_row(vec![Cell::new("Watched list directory"), Cell::new(&data_dir)]);
            table.add_row(vec![
                Cell::new("API key"),
                Cell::new(if key.is_some() {
                    format!("{} {} (from {})", "✓".green(), key_display, key_source)
                } else {
                    format!("{} {}", "✗".red(), key_display)
                }),
            ]);
            println!("{}", table);
        }
        _ => output.json(&json!({
            "config_file": config_file,
            "api": {
                "base_url": config.api.base_url,
                "request_timeout_secs": config.api.request_timeout_secs,
                "key": key_display,
                "key_configured": key.is_some(),
            },
            "data_dir": data_dir,
        })),
    }

    Ok(())
}

fn set_api_key(key: String, path_manager: &PathManager, output: &Output) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key cannot be empty"));
    }

    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;
    cred_store.set_api_key(key);
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("API key saved to {}", path_manager.credentials_file().display()));
    Ok(())
}

fn init_config(force: bool, config_file: &PathBuf, output: &Output) -> Result<()> {
    if config_file.exists() && !force {
        output.warn(format!("{} already exists (use --force to overwrite)", config_file.display()));
        return Ok(());
    }

    Config::default()
        .save_to_file(config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdef12"), "ab***12");
    }

    #[test]
    fn test_init_writes_to_given_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("custom").join("popcorn.toml");
        let output = Output::new(OutputFormat::Human, true);

        init_config(false, &config_file, &output).unwrap();
        let written = Config::load_from_file(&config_file).unwrap();
        assert_eq!(written.api.base_url, Config::default().api.base_url);

        std::fs::write(&config_file, "# edited\n").unwrap();
        init_config(false, &config_file, &output).unwrap();
        assert_eq!(std::fs::read_to_string(&config_file).unwrap(), "# edited\n");

        init_config(true, &config_file, &output).unwrap();
        assert!(Config::load_from_file(&config_file).is_ok());
        assert!(!dir.path().join("config.toml").exists());
    }
}
