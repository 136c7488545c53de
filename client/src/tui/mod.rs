//! Terminal user interface.
//!
//! Built with [`ratatui`]. The view never touches session state directly:
//! it renders an [`AppState`](crate::state::AppState) snapshot and turns key
//! presses into [`Event`](crate::events::Event)s for the runtime.
//!
//! # Submodules
//!
//! - [`app`]: View-local state and key bindings
//! - [`input`]: Terminal input and redraw events
//! - [`terminal`]: Terminal setup and cleanup with panic handling
//! - [`ui`]: Frame rendering

pub mod app;
pub mod input;
pub mod terminal;
pub mod ui;

pub use app::{Command, InputMode, ViewState};
pub use input::{EventHandler, TuiEvent};
pub use terminal::{install_panic_hook, Tui};
