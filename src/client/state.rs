//! Navigation state types.

use serde::{Deserialize, Serialize};

/// Payload stored with every history entry: the background page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub page: String,
}

impl HistoryState {
    pub fn new(page: impl Into<String>) -> Self {
        Self { page: page.into() }
    }
}

/// What the user is looking at.
///
/// `background_url` is absolute and never carries the modal marker;
/// `modal_url` is `Some` exactly while a modal is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub background_url: String,
    pub modal_url: Option<String>,
}

/// Result of a completed `load()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The fragment is in the DOM and a history entry records `url`.
    Displayed { url: String },
    /// The whole browser was sent to `url`.
    Navigated { url: String },
    /// The server sent a client-side payload; nothing changed.
    Callback { payload: String },
}

impl LoadOutcome {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            LoadOutcome::Displayed { .. } => "displayed",
            LoadOutcome::Navigated { .. } => "navigated",
            LoadOutcome::Callback { .. } => "callback",
        }
    }
}
