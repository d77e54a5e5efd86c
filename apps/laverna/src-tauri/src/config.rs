//! Run-mode flags and application paths
//!
//! The run mode comes from the command line (see `main.rs`); the paths are
//! resolved once at startup from the bundle's resource directory.

use std::path::{Path, PathBuf};
use tauri::Url;

use crate::error::{LavernaError, Result};

/// Development server serving the frontend with live reload
pub const DEV_SERVER_URL: &str = "http://localhost:9000";

/// Directory (relative to the app directory) holding the packaged frontend
const DIST_DIR: &str = "dist";

/// Entry document of the packaged frontend
const INDEX_FILE: &str = "index.html";

/// Script injected into the main window before page scripts run
const PRELOAD_FILE: &str = "preload.js";

/// Default window icon, relative to the app directory
const ICON_FILE: &str = "icons/icon.png";

/// How the application was launched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Load content from the dev server and open developer tools
    pub dev: bool,
    /// Start hidden, surfaced later from the tray
    pub tray: bool,
}

/// Filesystem locations the main window depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory the packaged frontend and preload script live in
    pub app_dir: PathBuf,
    /// Window icon; used as a hint only, it may not exist
    pub icon: PathBuf,
}

impl AppPaths {
    /// Lay out paths under `app_dir` using the default icon location
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();
        let icon = app_dir.join(ICON_FILE);
        Self { app_dir, icon }
    }

    /// Resolve the app directory for a running Tauri application
    ///
    /// Prefers the bundle resource directory and falls back to the
    /// directory containing the executable.
    pub fn resolve<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> Result<Self> {
        use tauri::Manager;

        if let Ok(dir) = app.path().resource_dir() {
            return Ok(Self::new(dir));
        }

        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| LavernaError::config("Executable has no parent directory"))?;
        Ok(Self::new(dir))
    }

    /// Preload script passed to the main window
    pub fn preload(&self) -> PathBuf {
        self.app_dir.join(PRELOAD_FILE)
    }

    /// `file://` URL of the packaged `dist/index.html`
    pub fn packaged_content_url(&self) -> Result<Url> {
        file_url(&self.app_dir.join(DIST_DIR).join(INDEX_FILE))
    }

    /// `file://` URL of the packaged `dist` directory, used as an allow-list entry
    pub fn packaged_dist_url(&self) -> Result<Url> {
        file_url(&self.app_dir.join(DIST_DIR))
    }
}

fn file_url(path: &Path) -> Result<Url> {
    Url::from_file_path(path)
        .map_err(|_| LavernaError::config(format!("Not an absolute path: {}", path.display())))
}
