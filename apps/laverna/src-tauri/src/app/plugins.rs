//! Plugin registration for Tauri

use tauri::Wry;

/// Register all plugins with the Tauri builder
pub fn register_plugins(builder: tauri::Builder<Wry>) -> tauri::Builder<Wry> {
    builder.plugin(tauri_plugin_opener::init())
}
