//! Main window creation options

use std::path::{Path, PathBuf};

use super::state::WindowState;

pub const WINDOW_TITLE: &str = "Laverna";
pub const MIN_WIDTH: f64 = 370.0;
pub const MIN_HEIGHT: f64 = 520.0;
pub const BACKGROUND_COLOR: &str = "#00a693";

/// Capabilities granted to the web content
#[derive(Debug, Clone, PartialEq)]
pub struct WebPreferences {
    pub context_isolation: bool,
    pub node_integration: bool,
    /// Script evaluated before any page script
    pub preload: Option<PathBuf>,
}

impl Default for WebPreferences {
    fn default() -> Self {
        Self {
            context_isolation: true,
            node_integration: false,
            preload: None,
        }
    }
}

/// Everything the host needs to build the main window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub title: String,
    pub icon: PathBuf,
    pub auto_hide_menu_bar: bool,
    /// `#rrggbb`
    pub background_color: String,
    pub web_preferences: WebPreferences,
}

impl WindowOptions {
    /// Build options from the restored state and the fixed defaults
    pub fn from_state(state: &WindowState, icon: &Path) -> Self {
        Self {
            width: state.width,
            height: state.height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            x: state.x,
            y: state.y,
            title: WINDOW_TITLE.to_string(),
            icon: icon.to_path_buf(),
            auto_hide_menu_bar: true,
            background_color: BACKGROUND_COLOR.to_string(),
            web_preferences: WebPreferences::default(),
        }
    }

    /// Copy used to create the main window: node integration off and the
    /// preload script set. `self` is left untouched.
    pub fn for_main_window(&self, preload: PathBuf) -> Self {
        Self {
            web_preferences: WebPreferences {
                node_integration: false,
                preload: Some(preload),
                ..self.web_preferences.clone()
            },
            ..self.clone()
        }
    }

    /// Background color as RGBA components, opaque
    pub fn background_rgba(&self) -> Option<(u8, u8, u8, u8)> {
        let hex = self.background_color.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?, 0xff))
    }
}
