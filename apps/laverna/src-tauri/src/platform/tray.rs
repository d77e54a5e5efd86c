//! System tray icon and menu
//!
//! Left click toggles the main window; the menu can show it or quit the app.

use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Wry,
};
use tracing::{debug, error};

use crate::app::with_window_manager;

/// Event sent to the page when the window is surfaced from the tray
pub const SHOWN_EVENT: &str = "window:shown";

const MENU_SHOW: &str = "show";
const MENU_QUIT: &str = "quit";

/// Build the tray menu with Show and Quit items
pub fn build_tray_menu(app: &App) -> Result<Menu<Wry>, Box<dyn std::error::Error>> {
    let show_item = MenuItem::with_id(app, MENU_SHOW, "Show Laverna", true, None::<&str>)?;
    let quit_item = MenuItem::with_id(app, MENU_QUIT, "Quit Laverna", true, None::<&str>)?;
    Ok(Menu::with_items(app, &[&show_item, &quit_item])?)
}

/// Create the tray icon
pub fn setup_tray(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let menu = build_tray_menu(app)?;

    let mut builder = TrayIconBuilder::new()
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray, event| {
            if is_left_click(&event) {
                toggle_main_window(tray.app_handle());
            }
        })
        .on_menu_event(|app, event| {
            handle_menu_event(app, event.id.as_ref());
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }

    builder.build(app)?;
    Ok(())
}

/// Check if a tray event is a left click release
pub fn is_left_click(event: &TrayIconEvent) -> bool {
    matches!(
        event,
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        }
    )
}

fn toggle_main_window(app: &AppHandle) {
    match with_window_manager(app, |manager| manager.toggle_show()) {
        Ok(visibility) => debug!(?visibility, "Toggled main window from tray"),
        Err(e) => error!("Failed to toggle main window: {}", e),
    }
}

fn show_main_window(app: &AppHandle) {
    let result = with_window_manager(app, |manager| {
        manager.send_show(SHOWN_EVENT)?;
        manager.focus_main()
    });
    if let Err(e) = result {
        error!("Failed to show main window: {}", e);
    }
}

/// Handle tray menu events (show, quit)
pub fn handle_menu_event(app: &AppHandle, event_id: &str) {
    match event_id {
        MENU_QUIT => app.exit(0),
        MENU_SHOW => show_main_window(app),
        _ => {}
    }
}
