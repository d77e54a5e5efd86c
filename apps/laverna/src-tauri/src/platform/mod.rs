//! Platform integration
//!
//! The tray is the only desktop integration; it surfaces the main window
//! when the app was started in tray mode.

pub mod tray;

/// Unified platform setup function
///
/// Call this from lib.rs during app setup, after the main window exists.
pub fn setup(app: &tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    tray::setup_tray(app)?;
    Ok(())
}
