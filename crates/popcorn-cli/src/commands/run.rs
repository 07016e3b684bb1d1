use crate::commands::input::{parse_input, Input, HELP};
use crate::output::Output;
use color_eyre::Result;
use movie_search_config::{resolve_api_key, Config, CredentialStore, PathManager, API_KEY_ENV};
use movie_search_core::{
    AddOutcome, AppController, FetchController, FetchSettings, FetchState, FileStorage,
    SelectionState, WatchedListStore,
};
use movie_search_sources::OmdbClient;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

const PROMPT: &str = "🍿 > ";

enum Event {
    Line(Option<String>),
    Fetch(Option<FetchState>),
}

pub fn load_api_key(path_manager: &PathManager) -> Option<String> {
    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    if let Err(e) = cred_store.load() {
        warn!(error = %e, "Failed to read credentials file");
    }
    resolve_api_key(&cred_store)
}

/// Wire the API client, fetch pipeline and watched list into an app controller.
pub fn build_app(config: &Config, path_manager: &PathManager, api_key: Option<String>) -> AppController {
    let client = OmdbClient::new(config.api.base_url.clone(), api_key, config.api.request_timeout());
    let fetch = FetchController::new(Arc::new(client), FetchSettings::from(&config.api));
    let watched = WatchedListStore::load(Box::new(FileStorage::new(path_manager.data_dir())));
    AppController::new(fetch, watched)
}

pub async fn run_interactive(config: Config, path_manager: PathManager, output: &Output) -> Result<()> {
    let api_key = load_api_key(&path_manager);
    if api_key.is_none() {
        error!(
            operation = "startup",
            env = API_KEY_ENV,
            "No API key configured, searches will fail until one is set"
        );
        output.warn(format!(
            "No API key configured. Set {} or run 'popcorn config set-api-key <KEY>'.",
            API_KEY_ENV
        ));
    }

    let mut app = build_app(&config, &path_manager, api_key);
    info!(
        operation = "startup",
        base_url = %config.api.base_url,
        watched = app.watched().len(),
        "Interactive session started"
    );

    output.info(HELP);
    output.prompt(PROMPT)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            update = app.next_fetch_update() => Event::Fetch(update),
        };

        match event {
            Event::Line(None) | Event::Fetch(None) => break,
            Event::Line(Some(line)) => {
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle_input(&mut app, input, output).await,
                    Err(msg) => output.warn(msg),
                }
                output.prompt(PROMPT)?;
            }
            Event::Fetch(Some(state)) => {
                if render_fetch_state(&state, output) {
                    output.prompt(PROMPT)?;
                }
            }
        }
    }

    app.shutdown();
    info!(operation = "shutdown", watched = app.watched().len(), "Interactive session ended");
    Ok(())
}

async fn handle_input(app: &mut AppController, input: Input, output: &Output) {
    match input {
        Input::Search(query) => {
            let cleared = query.is_empty();
            app.set_query(query);
            if cleared {
                output.info("Search cleared");
            } else if app.view().show_loader {
                output.info("Loading...");
            }
        }
        Input::Open(target) => {
            let id = resolve_target(app, &target);
            match app.select(&id) {
                SelectionState::Open(_) => {
                    if let Some(movie) = app.selected_movie() {
                        output.info(format!("Opening {}", movie.title()));
                    }
                    show_details(app, output).await
                }
                SelectionState::Closed => output.info("Details closed"),
            }
        }
        Input::Close => app.close_details(),
        Input::Details => show_details(app, output).await,
        Input::Add(rating) => add_selected(app, rating, output).await,
        Input::Delete(id) => {
            if app.delete_watched(&id) {
                output.success(format!("Removed {} from your watched list", id));
            } else {
                output.info(format!("{} is not in your watched list", id));
            }
        }
        Input::Watched => output.watched(&app.view().watched),
        Input::Results => show_results(app, output),
        Input::Help => output.info(HELP),
        Input::Quit => {}
    }
}

/// `n` picks the n-th current result; anything else is taken as an id.
fn resolve_target(app: &AppController, target: &str) -> String {
    let results = app.view().results;
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| results.get(index))
        .map(|movie| movie.id.clone())
        .unwrap_or_else(|| target.to_string())
}

async fn show_details(app: &AppController, output: &Output) {
    match app.selected_details().await {
        None => output.warn("No movie open. Use: open <n|id>"),
        Some(Ok(details)) => output.details(&details, app.watched_user_rating(&details.id)),
        Some(Err(e)) => {
            warn!(error = %e, "Failed to load movie details");
            output.error(format!("Could not load details: {}", e));
        }
    }
}

async fn add_selected(app: &mut AppController, rating: f32, output: &Output) {
    let details = match app.selected_details().await {
        None => return output.warn("No movie open. Use: open <n|id>"),
        Some(Err(e)) => return output.error(format!("Could not load details: {}", e)),
        Some(Ok(details)) => details,
    };

    match app.add_watched_from_details(&details, rating) {
        Ok(AddOutcome::Added) => output.success(format!("Added {} to your watched list", details.title)),
        Ok(AddOutcome::AlreadyWatched) => {
            let rated = app
                .watched_user_rating(&details.id)
                .map(|r| format!(" (you rated it {:.1})", r))
                .unwrap_or_default();
            output.warn(format!("{} is already in your watched list{}", details.title, rated));
        }
        Err(e) => output.error(e.to_string()),
    }
}

fn show_results(app: &AppController, output: &Output) {
    let view = app.view();
    if view.show_loader {
        output.info("Loading...");
    } else if view.show_error {
        output.error(format!("⛔ {}", view.error.unwrap_or_default()));
    } else if view.show_results {
        output.results(&view.results);
    } else {
        output.info("Start with: search <text>");
    }
}

/// Print a fetch transition. Returns whether the prompt should be redrawn.
fn render_fetch_state(state: &FetchState, output: &Output) -> bool {
    match state {
        FetchState::Idle => false,
        FetchState::Loading => {
            output.info("Loading...");
            false
        }
        FetchState::Success(results) => {
            output.results(results);
            true
        }
        FetchState::Failure(message) => {
            output.error(format!("⛔ {}", message));
            true
        }
    }
}
