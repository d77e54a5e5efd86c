//! Laverna desktop shell
//!
//! Sets up and runs the Tauri application around the single main window.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod window;

pub use config::RunMode;

/// Run the application in the given mode
pub fn run(mode: RunMode) {
    logging::init();
    tracing::info!(dev = mode.dev, tray = mode.tray, "Starting Laverna");

    app::register_plugins(tauri::Builder::default())
        .setup(move |app| {
            app::init_state(app, mode)?;

            // Platform-specific setup (tray)
            platform::setup(app)?;

            Ok(())
        })
        .on_window_event(app::handle_window_event)
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(app::handle_run_event);
}
