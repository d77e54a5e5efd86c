//! Seams between the window manager and the GUI toolkit
//!
//! The Tauri implementations live in `app::host`; tests use recording fakes.

use std::sync::Arc;
use tauri::Url;

use super::navigation::NavigationGuard;
use super::options::WindowOptions;
use super::state::Bounds;
use crate::error::Result;

/// Operations the window manager performs on a live toolkit window
pub trait MainWindow {
    fn show(&self) -> Result<()>;
    fn hide(&self) -> Result<()>;
    fn is_visible(&self) -> Result<bool>;
    fn maximize(&self) -> Result<()>;
    fn is_maximized(&self) -> Result<bool>;
    fn is_minimized(&self) -> Result<bool>;
    /// Undo a minimize
    fn restore(&self) -> Result<()>;
    fn focus(&self) -> Result<()>;
    fn open_devtools(&self);
    /// Emit `event` to the window's web content
    fn send(&self, event: &str) -> Result<()>;
    /// Outer position and inner size, in logical pixels
    fn bounds(&self) -> Result<Bounds>;
}

/// Creates toolkit windows and reports the display layout
pub trait WindowHost {
    type Window: MainWindow;

    /// Build a window loading `url`.
    ///
    /// Implementations must route both in-page navigation and new-window
    /// requests through `guard.on_navigation` and honor its decision.
    fn create_window(
        &self,
        label: &str,
        options: &WindowOptions,
        url: Url,
        guard: Arc<NavigationGuard>,
    ) -> Result<Self::Window>;

    /// Work areas of the connected displays; empty when unknown
    fn displays(&self) -> Vec<Bounds>;
}

/// Hands URLs to the operating system's default handler
pub trait ExternalOpener: Send + Sync {
    fn open_external(&self, url: &str) -> Result<()>;
}
