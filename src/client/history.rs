//! Browser history seam.
//!
//! Mirrors the parts of `window.history` / `window.location` the controller
//! touches. [`MemoryHistory`] is a faithful in-memory stack with back/forward,
//! used headless and in tests.

use serde::Serialize;

use crate::client::state::HistoryState;

pub trait History {
    /// Current address bar URL (absolute).
    fn location(&self) -> String;

    /// State payload of the current entry.
    fn state(&self) -> Option<HistoryState>;

    /// `history.pushState`: drops forward entries, appends one.
    fn push_state(&mut self, state: HistoryState, url: &str);

    /// `history.replaceState`: rewrites the current entry.
    fn replace_state(&mut self, state: HistoryState, url: &str);

    /// `window.location = url`: full page navigation.
    fn assign(&mut self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub url: String,
    pub state: Option<HistoryState>,
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
    navigations: Vec<String>,
}

impl MemoryHistory {
    /// Start with a single entry as left by an ordinary page load.
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.into(),
                state: None,
            }],
            index: 0,
            navigations: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs loaded through [`History::assign`], oldest first.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.current().url.clone()
    }

    fn state(&self) -> Option<HistoryState> {
        self.current().state.clone()
    }

    fn push_state(&mut self, state: HistoryState, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url: url.to_string(),
            state: Some(state),
        });
        self.index = self.entries.len() - 1;
    }

    fn replace_state(&mut self, state: HistoryState, url: &str) {
        self.entries[self.index] = HistoryEntry {
            url: url.to_string(),
            state: Some(state),
        };
    }

    fn assign(&mut self, url: &str) {
        self.navigations.push(url.to_string());
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url: url.to_string(),
            state: None,
        });
        self.index = self.entries.len() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = MemoryHistory::new("http://x/a");
        history.push_state(HistoryState::new("http://x/a"), "http://x/b");
        history.push_state(HistoryState::new("http://x/a"), "http://x/c");
        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());

        history.push_state(HistoryState::new("http://x/a"), "http://x/d");
        assert_eq!(history.len(), 2);
        assert!(!history.forward());
        assert_eq!(history.location(), "http://x/d");
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = MemoryHistory::new("http://x/a");
        history.replace_state(HistoryState::new("http://x/bg"), "http://x/a");
        assert_eq!(history.len(), 1);
        assert_eq!(history.state(), Some(HistoryState::new("http://x/bg")));
    }

    #[test]
    fn test_assign_records_navigation() {
        let mut history = MemoryHistory::new("http://x/a");
        history.assign("http://x/login");
        assert_eq!(history.navigations(), ["http://x/login".to_string()]);
        assert_eq!(history.location(), "http://x/login");
        assert_eq!(history.state(), None);
    }
}
