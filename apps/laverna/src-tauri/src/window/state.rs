//! Persisted window geometry
//!
//! Window state lives in a single JSON file in the platform config directory,
//! keyed by window name:
//!
//! ```json
//! { "main": { "width": 1000, "height": 600, "x": 40, "y": 60, "isMaximized": false } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{LavernaError, Result};

const WINDOW_STATE_FILE: &str = "window-state.json";

pub const DEFAULT_WIDTH: f64 = 1000.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;

/// A rectangle in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Geometry and maximized flag of a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowState {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub is_maximized: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            x: None,
            y: None,
            is_maximized: false,
        }
    }
}

impl WindowState {
    /// State to persist for a window currently at `bounds`.
    ///
    /// A maximized or minimized window keeps the last normal geometry so the
    /// next launch restores to a sensible size.
    pub fn capture(&self, bounds: Bounds, maximized: bool, minimized: bool) -> Self {
        if maximized || minimized {
            return Self {
                is_maximized: maximized,
                ..self.clone()
            };
        }

        Self {
            width: bounds.width,
            height: bounds.height,
            x: Some(bounds.x),
            y: Some(bounds.y),
            is_maximized: false,
        }
    }

    /// Make a restored state usable on the current display setup.
    ///
    /// Sizes below the minimum are raised to it. A position that would put
    /// the window outside every display is dropped. With no display
    /// information the position is kept as is.
    pub fn fit_to(mut self, displays: &[Bounds], min_width: f64, min_height: f64) -> Self {
        self.width = self.width.max(min_width);
        self.height = self.height.max(min_height);

        if let (Some(x), Some(y)) = (self.x, self.y) {
            let window = Bounds::new(x, y, self.width, self.height);
            if !displays.is_empty() && !displays.iter().any(|d| d.contains(&window)) {
                debug!(x, y, "Saved window position is off-screen, dropping it");
                self.x = None;
                self.y = None;
            }
        }

        self
    }
}

/// JSON-file backed store of window states
#[derive(Debug, Clone)]
pub struct WindowStateStore {
    path: PathBuf,
}

impl WindowStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory
    pub fn default_location() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("com", "laverna", "laverna")
            .ok_or_else(|| LavernaError::config("Failed to get config directory"))?
            .config_dir()
            .to_path_buf();

        Ok(Self::new(config_dir.join(WINDOW_STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state saved under `key`, or `defaults` when there is none.
    ///
    /// A file that cannot be parsed counts as no saved state.
    pub fn load(&self, key: &str, defaults: WindowState) -> Result<WindowState> {
        let Some(mut states) = self.read_all()? else {
            return Ok(defaults);
        };

        Ok(states.remove(key).unwrap_or(defaults))
    }

    /// Save `state` under `key`, keeping entries for other keys
    pub fn save(&self, key: &str, state: &WindowState) -> Result<()> {
        let mut states = self.read_all()?.unwrap_or_default();
        states.insert(key.to_string(), state.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&states)?;
        std::fs::write(&self.path, content)?;

        debug!(key, path = %self.path.display(), "Saved window state");
        Ok(())
    }

    fn read_all(&self) -> Result<Option<BTreeMap<String, WindowState>>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(states) => Ok(Some(states)),
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring unreadable window state: {}", e);
                Ok(None)
            }
        }
    }
}
