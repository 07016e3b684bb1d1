pub mod app;
pub mod fetch;
pub mod selection;
pub mod watched;

pub use app::{AppController, SelectedMovie, ViewState};
pub use fetch::{FetchController, FetchSettings, FetchState, FETCH_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
pub use selection::{SelectionState, SelectionStateMachine};
pub use watched::{
    AddOutcome, FileStorage, MemoryStorage, StorageError, WatchedError, WatchedListStore,
    WatchedStorage, WATCHED_KEY,
};
