//! Client navigation controller subsystem.
//!
//! # Data Flow
//! ```text
//! DOM event (dom.rs: ClickEvent / SubmitEvent / HideEvent)
//!     → controller.rs (filter by data-target="modal")
//!     → load(): marker + query/body → transport.rs (fetch)
//!     → protocol::ModalSignal::decode
//!         Content      → ModalHost swap + History push
//!         SelfRedirect → fetch again, History replace
//!         Redirect     → History::assign (full navigation)
//!         Callback     → returned to the caller
//! ```
//!
//! # Design Decisions
//! - Browser APIs sit behind traits (History, ModalHost, Transport) so the
//!   state machine runs headless
//! - History state carries only the background page URL

pub mod controller;
pub mod dom;
pub mod history;
pub mod state;
pub mod transport;

pub use controller::{ControllerError, NavigationController};
pub use dom::{ClickEvent, Element, HideEvent, MemoryHost, ModalHost, SubmitEvent};
pub use history::{History, HistoryEntry, MemoryHistory};
pub use state::{HistoryState, LoadOutcome, NavigationState};
pub use transport::{FetchRequest, FetchResponse, HttpTransport, RouterTransport, Transport, TransportError};
