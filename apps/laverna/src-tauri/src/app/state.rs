//! Application state initialization
//!
//! The window manager is created during setup and kept in managed state so
//! tray and run-event handlers can reach it.

use std::sync::{Arc, Mutex};
use tauri::{App, AppHandle, Manager};

use super::host::{TauriHost, TauriOpener};
use crate::config::{AppPaths, RunMode};
use crate::error::{LavernaError, Result};
use crate::window::{WindowManager, WindowStateStore};

/// Managed state holding the main window manager
pub type MainWindowManager = Mutex<WindowManager<TauriHost>>;

/// Create the main window and register the window manager
pub fn init_state(app: &App, mode: RunMode) -> Result<()> {
    let handle = app.handle().clone();

    let paths = AppPaths::resolve(&handle)?;
    let store = WindowStateStore::default_location()?;
    let opener = Arc::new(TauriOpener::new(handle.clone()));

    let mut manager = WindowManager::new(TauriHost::new(handle), store, opener, paths)?;
    manager.create_main(mode)?;
    manager.listen_to_main()?;

    app.manage(MainWindowManager::new(manager));
    Ok(())
}

/// Run `f` against the managed window manager
pub fn with_window_manager<T>(
    app: &AppHandle,
    f: impl FnOnce(&mut WindowManager<TauriHost>) -> Result<T>,
) -> Result<T> {
    let state = app
        .try_state::<MainWindowManager>()
        .ok_or_else(|| LavernaError::from("Window manager not initialized"))?;
    let mut manager = state
        .lock()
        .map_err(|e| LavernaError::lock(e.to_string()))?;
    f(&mut manager)
}
