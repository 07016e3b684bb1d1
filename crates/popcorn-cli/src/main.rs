use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use movie_search_config::{Config, PathManager};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - search movies and keep track of what you've watched")]
#[command(version)]
struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the watched list
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Write logs to this file instead of the default log directory
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive search session (default)
    #[command(long_about = "Start an interactive session: type 'search <text>' to look up movies, 'open <n>' to see details, 'add <rating>' to mark the open movie as watched.")]
    Run,
    /// Manage configuration and the API key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the full API key
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store the movie API key in the credentials file
    #[command(long_about = "Store the movie API key in credentials.toml. The OMDB_API_KEY environment variable takes precedence when set.")]
    SetApiKey {
        key: String,
    },

    /// Write a config.toml with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let mut path_manager = PathManager::default();
    let config_file = cli.config.clone().unwrap_or_else(|| path_manager.config_file());

    // The interactive session logs to a file so log lines stay out of the prompt
    let log_file = match command {
        Commands::Run => Some(cli.log_file.clone().unwrap_or_else(|| path_manager.log_file())),
        Commands::Config { .. } => cli.log_file.clone(),
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| eyre!("{}", e))?;

    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

    if let Some(data_dir) = cli.data_dir.clone().or_else(|| config.storage.data_dir.clone()) {
        path_manager = path_manager.with_data_dir(data_dir);
    }

    let output = output::Output::new(cli.output, cli.quiet);

    match command {
        Commands::Run => {
            path_manager
                .ensure_directories()
                .map_err(|e| eyre!("Failed to create popcorn directories: {}", e))?;
            commands::run::run_interactive(config, path_manager, &output).await
        }
        Commands::Config { cmd } => {
            commands::config::run_config(cmd, &config, &config_file, &path_manager, &output)
        }
    }
}
