//! Application lifecycle event handling
//!
//! This module handles window events and application run events.

use tauri::{AppHandle, RunEvent, WindowEvent};
use tracing::error;

#[cfg(not(target_os = "macos"))]
use tauri::Manager;

use super::state::with_window_manager;
use crate::window::MAIN_WINDOW;

/// Handle window events
pub fn handle_window_event(window: &tauri::Window, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW {
        return;
    }

    // On macOS, hide the window instead of closing to keep the app running
    #[cfg(target_os = "macos")]
    if let WindowEvent::CloseRequested { api, .. } = event {
        let _ = window.hide();
        api.prevent_close();
    }

    // Elsewhere closing the main window ends the app, so save its state
    // while it still exists
    #[cfg(not(target_os = "macos"))]
    if let WindowEvent::CloseRequested { .. } = event {
        save_main_window(window.app_handle());
    }
}

/// Handle application run events
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { .. } => save_main_window(app),
        // Handle dock click on macOS to reopen the window
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            if let Err(e) = with_window_manager(app, |manager| {
                if let Some(window) = manager.main_window() {
                    crate::window::MainWindow::show(window)?;
                }
                manager.focus_main()
            }) {
                error!("Failed to reopen main window: {}", e);
            }
        }
        _ => {}
    }
}

fn save_main_window(app: &AppHandle) {
    if let Err(e) = with_window_manager(app, |manager| manager.on_before_app_quit()) {
        error!("Failed to save main window state: {}", e);
    }
}
