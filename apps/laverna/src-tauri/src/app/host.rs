//! Tauri implementations of the window seams
//!
//! `TauriHost` builds the main `WebviewWindow`, `TauriWindow` wraps it for
//! the window manager and `TauriOpener` hands URLs to the opener plugin.

use std::sync::Arc;
use tauri::image::Image;
use tauri::webview::NewWindowResponse;
use tauri::window::Color;
use tauri::{AppHandle, Emitter, EventTarget, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, warn};

use crate::error::Result;
use crate::window::{
    Bounds, ExternalOpener, MainWindow, NavigationGuard, NavigationKind, WindowHost,
    WindowOptions,
};

/// Creates windows on the running Tauri application
pub struct TauriHost {
    app: AppHandle,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl WindowHost for TauriHost {
    type Window = TauriWindow;

    fn create_window(
        &self,
        label: &str,
        options: &WindowOptions,
        url: Url,
        guard: Arc<NavigationGuard>,
    ) -> Result<TauriWindow> {
        let mut builder = WebviewWindowBuilder::new(&self.app, label, WebviewUrl::External(url))
            .title(&options.title)
            .inner_size(options.width, options.height)
            .min_inner_size(options.min_width, options.min_height);

        builder = match (options.x, options.y) {
            (Some(x), Some(y)) => builder.position(x, y),
            _ => builder.center(),
        };

        if let Some((r, g, b, a)) = options.background_rgba() {
            builder = builder.background_color(Color(r, g, b, a));
        }

        match Image::from_path(&options.icon) {
            Ok(icon) => builder = builder.icon(icon)?,
            Err(e) => debug!(path = %options.icon.display(), "Window icon not loaded: {}", e),
        }

        // Node integration and context isolation have no webview switches:
        // the page never gets native access and the preload script runs
        // before any page script.
        if let Some(preload) = &options.web_preferences.preload {
            match std::fs::read_to_string(preload) {
                Ok(script) => builder = builder.initialization_script(&script),
                Err(e) => warn!(path = %preload.display(), "Preload script not loaded: {}", e),
            }
        }

        let navigate_guard = guard.clone();
        builder = builder.on_navigation(move |url| {
            navigate_guard
                .on_navigation(NavigationKind::Navigate, url.as_str())
                .is_allowed()
        });

        builder = builder.on_new_window(move |url, _features| {
            if guard
                .on_navigation(NavigationKind::NewWindow, url.as_str())
                .is_allowed()
            {
                NewWindowResponse::Allow
            } else {
                NewWindowResponse::Deny
            }
        });

        Ok(TauriWindow(builder.build()?))
    }

    fn displays(&self) -> Vec<Bounds> {
        match self.app.available_monitors() {
            Ok(monitors) => monitors
                .iter()
                .map(|monitor| {
                    let scale = monitor.scale_factor();
                    let position = monitor.position().to_logical::<f64>(scale);
                    let size = monitor.size().to_logical::<f64>(scale);
                    Bounds::new(position.x, position.y, size.width, size.height)
                })
                .collect(),
            Err(e) => {
                warn!("Failed to list monitors: {}", e);
                Vec::new()
            }
        }
    }
}

/// The main `WebviewWindow`
pub struct TauriWindow(WebviewWindow);

impl MainWindow for TauriWindow {
    fn show(&self) -> Result<()> {
        Ok(self.0.show()?)
    }

    fn hide(&self) -> Result<()> {
        Ok(self.0.hide()?)
    }

    fn is_visible(&self) -> Result<bool> {
        Ok(self.0.is_visible()?)
    }

    fn maximize(&self) -> Result<()> {
        Ok(self.0.maximize()?)
    }

    fn is_maximized(&self) -> Result<bool> {
        Ok(self.0.is_maximized()?)
    }

    fn is_minimized(&self) -> Result<bool> {
        Ok(self.0.is_minimized()?)
    }

    fn restore(&self) -> Result<()> {
        Ok(self.0.unminimize()?)
    }

    fn focus(&self) -> Result<()> {
        Ok(self.0.set_focus()?)
    }

    fn open_devtools(&self) {
        self.0.open_devtools();
    }

    fn send(&self, event: &str) -> Result<()> {
        let target = EventTarget::webview_window(self.0.label());
        Ok(self.0.emit_to(target, event, ())?)
    }

    fn bounds(&self) -> Result<Bounds> {
        let scale = self.0.scale_factor()?;
        let position = self.0.outer_position()?.to_logical::<f64>(scale);
        let size = self.0.inner_size()?.to_logical::<f64>(scale);
        Ok(Bounds::new(position.x, position.y, size.width, size.height))
    }
}

/// Opens URLs with the system's default handler
pub struct TauriOpener {
    app: AppHandle,
}

impl TauriOpener {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ExternalOpener for TauriOpener {
    fn open_external(&self, url: &str) -> Result<()> {
        Ok(self.app.opener().open_url(url, None::<&str>)?)
    }
}
