//! Main window management
//!
//! - `manager`: lifecycle of the single main window
//! - `options`: creation options derived from saved state
//! - `state`: persisted geometry
//! - `navigation`: allow-list for URLs loaded inside the window
//! - `host`: traits implemented by the toolkit adapter

pub mod host;
pub mod manager;
pub mod navigation;
pub mod options;
pub mod state;

pub use host::{ExternalOpener, MainWindow, WindowHost};
pub use manager::{Visibility, WindowManager, MAIN_WINDOW};
pub use navigation::{NavigationDecision, NavigationGuard, NavigationKind, UrlPolicy};
pub use options::{WebPreferences, WindowOptions};
pub use state::{Bounds, WindowState, WindowStateStore};
