use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Closed,
    Open(String),
}

impl SelectionState {
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            SelectionState::Open(id) => Some(id),
            SelectionState::Closed => None,
        }
    }
}

/// Which movie, if any, has its detail view open.
pub struct SelectionStateMachine {
    state_tx: watch::Sender<SelectionState>,
}

impl SelectionStateMachine {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SelectionState::Closed);
        Self { state_tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> SelectionState {
        self.state_tx.borrow().clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state_tx.borrow().selected_id().map(str::to_string)
    }

    /// Open `id`, or close it if it is already the open one.
    pub fn select(&self, id: &str) -> SelectionState {
        self.state_tx.send_modify(|state| {
            let next = match &*state {
                SelectionState::Open(current) if current == id => SelectionState::Closed,
                _ => SelectionState::Open(id.to_string()),
            };
            *state = next;
        });
        let state = self.state();
        debug!(id, open = state.selected_id().is_some(), "Selection changed");
        state
    }

    /// Close the detail view. Subscribers are not notified when already closed.
    pub fn close(&self) {
        self.state_tx.send_if_modified(|state| {
            if *state == SelectionState::Closed {
                false
            } else {
                *state = SelectionState::Closed;
                true
            }
        });
    }
}

impl Default for SelectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_closed() {
        let selection = SelectionStateMachine::new();
        assert_eq!(selection.state(), SelectionState::Closed);
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_select_same_id_toggles_closed() {
        let selection = SelectionStateMachine::new();
        assert_eq!(selection.select("tt1"), SelectionState::Open("tt1".to_string()));
        assert_eq!(selection.select("tt1"), SelectionState::Closed);
    }

    #[test]
    fn test_select_other_id_switches() {
        let selection = SelectionStateMachine::new();
        selection.select("tt1");
        assert_eq!(selection.select("tt2"), SelectionState::Open("tt2".to_string()));
        assert_eq!(selection.selected_id(), Some("tt2".to_string()));
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let selection = SelectionStateMachine::new();
        let mut rx = selection.subscribe();

        selection.close();
        assert_eq!(selection.state(), SelectionState::Closed);
        assert!(!rx.has_changed().unwrap());

        selection.select("tt1");
        selection.close();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SelectionState::Closed);
    }
}
