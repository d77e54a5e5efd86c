//! Main window lifecycle
//!
//! [`WindowManager`] owns the single main window: it computes the creation
//! options from the saved state, builds the window, flips its visibility and
//! saves its geometry when the app quits.

use std::sync::Arc;
use tauri::Url;
use tracing::{debug, info, warn};

use super::host::{ExternalOpener, MainWindow, WindowHost};
use super::navigation::{NavigationDecision, NavigationGuard, UrlPolicy};
use super::options::{WindowOptions, MIN_HEIGHT, MIN_WIDTH};
use super::state::{WindowState, WindowStateStore};
use crate::config::{AppPaths, RunMode, DEV_SERVER_URL};
use crate::error::{LavernaError, Result};

/// Label of the main window, also the key its state is saved under
pub const MAIN_WINDOW: &str = "main";

/// Visibility of the window after [`WindowManager::toggle_show`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

enum Slot<W> {
    Absent,
    Live(W),
    Released,
}

pub struct WindowManager<H: WindowHost> {
    host: H,
    store: WindowStateStore,
    paths: AppPaths,
    state: WindowState,
    options: WindowOptions,
    guard: Arc<NavigationGuard>,
    slot: Slot<H::Window>,
}

impl<H: WindowHost> WindowManager<H> {
    /// Load the saved state for the main window and compute its options.
    /// No window is created yet.
    pub fn new(
        host: H,
        store: WindowStateStore,
        opener: Arc<dyn ExternalOpener>,
        paths: AppPaths,
    ) -> Result<Self> {
        let state = store
            .load(MAIN_WINDOW, WindowState::default())?
            .fit_to(&host.displays(), MIN_WIDTH, MIN_HEIGHT);
        debug!(?state, "Restored main window state");

        let options = WindowOptions::from_state(&state, &paths.icon);
        let policy = UrlPolicy::new([
            DEV_SERVER_URL.to_string(),
            paths.packaged_dist_url()?.to_string(),
        ]);

        Ok(Self {
            host,
            store,
            paths,
            state,
            options,
            guard: Arc::new(NavigationGuard::new(policy, opener)),
            slot: Slot::Absent,
        })
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn policy(&self) -> &UrlPolicy {
        self.guard.policy()
    }

    /// The live main window, if any
    pub fn main_window(&self) -> Option<&H::Window> {
        match &self.slot {
            Slot::Live(win) => Some(win),
            _ => None,
        }
    }

    fn window(&self) -> Result<&H::Window> {
        match &self.slot {
            Slot::Live(win) => Ok(win),
            Slot::Absent => Err(LavernaError::WindowNotCreated),
            Slot::Released => Err(LavernaError::WindowReleased),
        }
    }

    /// Create the main window.
    ///
    /// Dev mode loads the dev server and opens developer tools; otherwise the
    /// packaged `dist/index.html` is loaded. Tray mode starts hidden.
    pub fn create_main(&mut self, mode: RunMode) -> Result<()> {
        match self.slot {
            Slot::Live(_) => return Err(LavernaError::WindowAlreadyCreated),
            Slot::Released => return Err(LavernaError::WindowReleased),
            Slot::Absent => {}
        }

        let options = self.options.for_main_window(self.paths.preload());
        let url = if mode.dev {
            Url::parse(DEV_SERVER_URL).map_err(|e| LavernaError::config(e.to_string()))?
        } else {
            self.paths.packaged_content_url()?
        };

        info!(dev = mode.dev, tray = mode.tray, %url, "Creating main window");
        let win = self
            .host
            .create_window(MAIN_WINDOW, &options, url, self.guard.clone())?;

        if self.state.is_maximized {
            win.maximize()?;
        }

        if mode.dev {
            win.open_devtools();
        }

        if mode.tray {
            win.hide()?;
        }

        self.slot = Slot::Live(win);
        Ok(())
    }

    /// Start sending navigation and new-window requests through
    /// [`Self::handle_url`]. Calling it again has no effect.
    pub fn listen_to_main(&self) -> Result<()> {
        self.window()?;

        if !self.guard.listen() {
            warn!("Navigation handlers already registered for the main window");
        }
        Ok(())
    }

    /// Show the window, then emit `event` to its content
    pub fn send_show(&self, event: &str) -> Result<()> {
        let win = self.window()?;
        win.show()?;
        win.send(event)
    }

    /// Decide whether `url` may load in the app; disallowed URLs are opened
    /// externally
    pub fn handle_url(&self, url: &str) -> NavigationDecision {
        self.guard.handle_url(url)
    }

    pub fn toggle_show(&self) -> Result<Visibility> {
        let win = self.window()?;

        if win.is_visible()? {
            win.hide()?;
            return Ok(Visibility::Hidden);
        }

        win.show()?;
        Ok(Visibility::Shown)
    }

    pub fn focus_main(&self) -> Result<()> {
        let win = self.window()?;

        if win.is_minimized()? {
            win.restore()?;
        }

        win.focus()
    }

    /// Save the main window's state and release it.
    ///
    /// Returns whether anything was saved; without a live window this does
    /// nothing.
    pub fn on_before_app_quit(&mut self) -> Result<bool> {
        let Slot::Live(win) = &self.slot else {
            return Ok(false);
        };

        let next = self.state.capture(
            win.bounds()?,
            win.is_maximized()?,
            win.is_minimized()?,
        );
        self.store.save(MAIN_WINDOW, &next)?;
        info!(path = %self.store.path().display(), "Saved main window state");

        // Stays live until the state is saved
        self.slot = Slot::Released;
        self.state = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::state::Bounds;
    use crate::window::NavigationKind;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeWindowState {
        visible: bool,
        maximized: bool,
        minimized: bool,
        focused: bool,
        devtools: bool,
        bounds: Option<Bounds>,
        bounds_unavailable: bool,
        sent: Vec<String>,
        calls: Vec<&'static str>,
    }

    #[derive(Clone)]
    struct FakeWindow(Arc<Mutex<FakeWindowState>>);

    impl FakeWindow {
        fn with<T>(&self, f: impl FnOnce(&mut FakeWindowState) -> T) -> T {
            f(&mut self.0.lock().unwrap())
        }
    }

    impl MainWindow for FakeWindow {
        fn show(&self) -> Result<()> {
            self.with(|w| {
                w.calls.push("show");
                w.visible = true;
            });
            Ok(())
        }
        fn hide(&self) -> Result<()> {
            self.with(|w| {
                w.calls.push("hide");
                w.visible = false;
            });
            Ok(())
        }
        fn is_visible(&self) -> Result<bool> {
            Ok(self.with(|w| w.visible))
        }
        fn maximize(&self) -> Result<()> {
            self.with(|w| {
                w.calls.push("maximize");
                w.maximized = true;
            });
            Ok(())
        }
        fn is_maximized(&self) -> Result<bool> {
            Ok(self.with(|w| w.maximized))
        }
        fn is_minimized(&self) -> Result<bool> {
            Ok(self.with(|w| w.minimized))
        }
        fn restore(&self) -> Result<()> {
            self.with(|w| {
                w.calls.push("restore");
                w.minimized = false;
            });
            Ok(())
        }
        fn focus(&self) -> Result<()> {
            self.with(|w| {
                w.calls.push("focus");
                w.focused = true;
            });
            Ok(())
        }
        fn open_devtools(&self) {
            self.with(|w| {
                w.calls.push("open_devtools");
                w.devtools = true;
            });
        }
        fn send(&self, event: &str) -> Result<()> {
            self.with(|w| {
                w.calls.push("send");
                w.sent.push(event.to_string());
            });
            Ok(())
        }
        fn bounds(&self) -> Result<Bounds> {
            self.with(|w| {
                if w.bounds_unavailable {
                    return Err(LavernaError::from("window is being destroyed"));
                }
                Ok(w.bounds.unwrap_or(Bounds::new(0.0, 0.0, 1000.0, 600.0)))
            })
        }
    }

    #[derive(Default)]
    struct Created {
        label: String,
        url: Option<Url>,
        options: Option<WindowOptions>,
        guard: Option<Arc<NavigationGuard>>,
        window: Option<FakeWindow>,
        count: usize,
    }

    #[derive(Default)]
    struct FakeHost {
        displays: Vec<Bounds>,
        created: Arc<Mutex<Created>>,
    }

    impl WindowHost for FakeHost {
        type Window = FakeWindow;

        fn create_window(
            &self,
            label: &str,
            options: &WindowOptions,
            url: Url,
            guard: Arc<NavigationGuard>,
        ) -> Result<FakeWindow> {
            let window = FakeWindow(Arc::new(Mutex::new(FakeWindowState {
                visible: true,
                ..Default::default()
            })));
            let mut created = self.created.lock().unwrap();
            created.label = label.to_string();
            created.url = Some(url);
            created.options = Some(options.clone());
            created.guard = Some(guard);
            created.window = Some(window.clone());
            created.count += 1;
            Ok(window)
        }

        fn displays(&self) -> Vec<Bounds> {
            self.displays.clone()
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl ExternalOpener for RecordingOpener {
        fn open_external(&self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct Fixture {
        manager: WindowManager<FakeHost>,
        created: Arc<Mutex<Created>>,
        opener: Arc<RecordingOpener>,
        store: WindowStateStore,
        app_dir: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_state(None, Vec::new())
        }

        fn with_state(saved: Option<WindowState>, displays: Vec<Bounds>) -> Self {
            crate::logging::init_test();

            let root = std::env::temp_dir().join(format!("laverna-wm-{}", uuid::Uuid::new_v4()));
            let store = WindowStateStore::new(root.join("config").join("window-state.json"));
            if let Some(state) = saved {
                store.save(MAIN_WINDOW, &state).unwrap();
            }

            let app_dir = root.join("app");
            let host = FakeHost {
                displays,
                ..Default::default()
            };
            let created = host.created.clone();
            let opener = Arc::new(RecordingOpener::default());
            let manager =
                WindowManager::new(host, store.clone(), opener.clone(), AppPaths::new(&app_dir))
                    .unwrap();

            Self {
                manager,
                created,
                opener,
                store,
                app_dir,
            }
        }

        fn window(&self) -> FakeWindow {
            self.created.lock().unwrap().window.clone().unwrap()
        }

        fn opened(&self) -> Vec<String> {
            self.opener.opened.lock().unwrap().clone()
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            if let Some(root) = self.app_dir.parent() {
                let _ = std::fs::remove_dir_all(root);
            }
        }
    }

    #[test]
    fn test_construction_uses_defaults_without_saved_state() {
        let fx = Fixture::new();
        let options = fx.manager.options();

        assert_eq!(options.width, 1000.0);
        assert_eq!(options.height, 600.0);
        assert_eq!(options.min_width, 370.0);
        assert_eq!(options.min_height, 520.0);
        assert_eq!(options.background_color, "#00a693");
        assert_eq!(options.icon, fx.app_dir.join("icons/icon.png"));
        assert!(fx.manager.main_window().is_none());
        assert_eq!(fx.created.lock().unwrap().count, 0);
    }

    #[test]
    fn test_construction_restores_saved_geometry() {
        let saved = WindowState {
            width: 1200.0,
            height: 800.0,
            x: Some(100.0),
            y: Some(50.0),
            is_maximized: false,
        };
        let fx = Fixture::with_state(Some(saved), vec![Bounds::new(0.0, 0.0, 1920.0, 1080.0)]);

        let options = fx.manager.options();
        assert_eq!((options.width, options.height), (1200.0, 800.0));
        assert_eq!((options.x, options.y), (Some(100.0), Some(50.0)));
    }

    #[test]
    fn test_off_screen_position_is_dropped() {
        let saved = WindowState {
            x: Some(5000.0),
            y: Some(5000.0),
            ..WindowState::default()
        };
        let fx = Fixture::with_state(Some(saved), vec![Bounds::new(0.0, 0.0, 1920.0, 1080.0)]);

        assert_eq!(fx.manager.options().x, None);
        assert_eq!(fx.manager.options().y, None);
    }

    #[test]
    fn test_allow_list_contains_dev_server_and_dist() {
        let fx = Fixture::new();
        let allowed = fx.manager.policy().allowed();

        assert_eq!(allowed[0], "http://localhost:9000");
        assert!(allowed[1].starts_with("file://"));
        assert!(allowed[1].ends_with("/app/dist"));
    }

    #[test]
    fn test_create_main_in_dev_mode() {
        let mut fx = Fixture::new();
        fx.manager
            .create_main(RunMode {
                dev: true,
                tray: false,
            })
            .unwrap();

        let created = fx.created.lock().unwrap();
        assert_eq!(created.label, "main");
        assert_eq!(created.url.as_ref().unwrap().as_str(), "http://localhost:9000/");

        let options = created.options.as_ref().unwrap();
        assert!(!options.web_preferences.node_integration);
        assert_eq!(
            options.web_preferences.preload.as_deref(),
            Some(fx.app_dir.join("preload.js").as_path())
        );
        drop(created);

        let win = fx.window();
        assert!(win.with(|w| w.devtools));
        assert!(win.with(|w| w.visible));
        assert!(!win.with(|w| w.maximized));
        // The stored options stay untouched
        assert_eq!(fx.manager.options().web_preferences.preload, None);
    }

    #[test]
    fn test_create_main_packaged_in_tray_mode() {
        let mut fx = Fixture::new();
        fx.manager
            .create_main(RunMode {
                dev: false,
                tray: true,
            })
            .unwrap();

        let url = fx.created.lock().unwrap().url.clone().unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(
            url.to_file_path().unwrap(),
            fx.app_dir.join("dist").join("index.html")
        );

        let win = fx.window();
        assert!(!win.with(|w| w.visible));
        assert!(!win.with(|w| w.devtools));
    }

    #[test]
    fn test_create_main_maximizes_when_saved_maximized() {
        let saved = WindowState {
            is_maximized: true,
            ..WindowState::default()
        };
        let mut fx = Fixture::with_state(Some(saved), Vec::new());
        fx.manager.create_main(RunMode::default()).unwrap();

        assert!(fx.window().with(|w| w.maximized));
    }

    #[test]
    fn test_create_main_twice_is_rejected() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();

        let err = fx.manager.create_main(RunMode::default()).unwrap_err();
        assert!(matches!(err, LavernaError::WindowAlreadyCreated));
        assert_eq!(fx.created.lock().unwrap().count, 1);
    }

    #[test]
    fn test_operations_before_create_fail() {
        let fx = Fixture::new();

        assert!(matches!(
            fx.manager.toggle_show(),
            Err(LavernaError::WindowNotCreated)
        ));
        assert!(matches!(
            fx.manager.focus_main(),
            Err(LavernaError::WindowNotCreated)
        ));
        assert!(matches!(
            fx.manager.listen_to_main(),
            Err(LavernaError::WindowNotCreated)
        ));
        assert!(matches!(
            fx.manager.send_show("notes:new"),
            Err(LavernaError::WindowNotCreated)
        ));
    }

    #[test]
    fn test_handle_url_allowed() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.handle_url("http://localhost:9000/foo"),
            NavigationDecision::Allow
        );
        assert_eq!(
            fx.manager.handle_url("blob:https://example.com/1234"),
            NavigationDecision::Allow
        );
        assert!(fx.opened().is_empty());
    }

    #[test]
    fn test_handle_url_packaged_content_allowed() {
        let fx = Fixture::new();
        let dist = AppPaths::new(&fx.app_dir).packaged_content_url().unwrap();

        assert!(fx.manager.handle_url(dist.as_str()).is_allowed());
        assert!(fx.opened().is_empty());
    }

    #[test]
    fn test_handle_url_redirects_external() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.handle_url("https://example.com"),
            NavigationDecision::Cancel
        );
        assert_eq!(fx.opened(), vec!["https://example.com"]);
    }

    #[test]
    fn test_listen_to_main_arms_window_hooks() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        let guard = fx.created.lock().unwrap().guard.clone().unwrap();

        assert!(guard
            .on_navigation(NavigationKind::Navigate, "https://example.com")
            .is_allowed());
        assert!(fx.opened().is_empty());

        fx.manager.listen_to_main().unwrap();
        fx.manager.listen_to_main().unwrap();

        assert_eq!(
            guard.on_navigation(NavigationKind::NewWindow, "https://example.com"),
            NavigationDecision::Cancel
        );
        assert_eq!(fx.opened(), vec!["https://example.com"]);
    }

    #[test]
    fn test_send_show_shows_then_sends() {
        let mut fx = Fixture::new();
        fx.manager
            .create_main(RunMode {
                dev: false,
                tray: true,
            })
            .unwrap();

        fx.manager.send_show("notes:new").unwrap();

        let win = fx.window();
        assert!(win.with(|w| w.visible));
        assert_eq!(win.with(|w| w.sent.clone()), vec!["notes:new"]);
        let calls = win.with(|w| w.calls.clone());
        assert_eq!(&calls[calls.len() - 2..], &["show", "send"]);
    }

    #[test]
    fn test_toggle_show_flips_visibility() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        let win = fx.window();
        win.with(|w| w.bounds = Some(Bounds::new(1.0, 2.0, 900.0, 700.0)));

        assert_eq!(fx.manager.toggle_show().unwrap(), Visibility::Hidden);
        assert!(!win.with(|w| w.visible));

        assert_eq!(fx.manager.toggle_show().unwrap(), Visibility::Shown);
        assert!(win.with(|w| w.visible));

        assert_eq!(
            win.bounds().unwrap(),
            Bounds::new(1.0, 2.0, 900.0, 700.0)
        );
        assert!(!win.with(|w| w.maximized));
    }

    #[test]
    fn test_focus_main_restores_minimized() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        let win = fx.window();
        win.with(|w| w.minimized = true);

        fx.manager.focus_main().unwrap();

        assert!(!win.with(|w| w.minimized));
        assert!(win.with(|w| w.focused));
        assert_eq!(
            win.with(|w| w.calls.clone()),
            vec!["restore", "focus"]
        );
    }

    #[test]
    fn test_focus_main_on_normal_window_only_focuses() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        let win = fx.window();

        fx.manager.focus_main().unwrap();
        fx.manager.focus_main().unwrap();

        assert_eq!(win.with(|w| w.calls.clone()), vec!["focus", "focus"]);
        assert!(win.with(|w| w.visible));
    }

    #[test]
    fn test_quit_saves_state_and_releases_window() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        fx.window()
            .with(|w| w.bounds = Some(Bounds::new(15.0, 25.0, 1100.0, 750.0)));

        assert!(fx.manager.on_before_app_quit().unwrap());
        assert!(fx.manager.main_window().is_none());

        let saved = fx.store.load(MAIN_WINDOW, WindowState::default()).unwrap();
        assert_eq!(
            saved,
            WindowState {
                width: 1100.0,
                height: 750.0,
                x: Some(15.0),
                y: Some(25.0),
                is_maximized: false,
            }
        );
    }

    #[test]
    fn test_failed_quit_keeps_window_and_can_be_retried() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        let win = fx.window();
        win.with(|w| w.bounds_unavailable = true);

        assert!(fx.manager.on_before_app_quit().is_err());
        assert!(fx.manager.main_window().is_some());
        assert!(!fx.store.path().exists());
        assert_eq!(fx.manager.toggle_show().unwrap(), Visibility::Hidden);

        win.with(|w| {
            w.bounds_unavailable = false;
            w.bounds = Some(Bounds::new(12.0, 34.0, 980.0, 640.0));
        });

        assert!(fx.manager.on_before_app_quit().unwrap());
        assert!(fx.manager.main_window().is_none());
        let saved = fx.store.load(MAIN_WINDOW, WindowState::default()).unwrap();
        assert_eq!((saved.width, saved.height), (980.0, 640.0));
        assert_eq!((saved.x, saved.y), (Some(12.0), Some(34.0)));
    }

    #[test]
    fn test_second_quit_does_not_write() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        assert!(fx.manager.on_before_app_quit().unwrap());

        std::fs::remove_file(fx.store.path()).unwrap();
        assert!(!fx.manager.on_before_app_quit().unwrap());
        assert!(!fx.store.path().exists());
    }

    #[test]
    fn test_quit_without_window_is_noop() {
        let mut fx = Fixture::new();

        assert!(!fx.manager.on_before_app_quit().unwrap());
        assert!(!fx.store.path().exists());

        // The window can still be created afterwards
        fx.manager.create_main(RunMode::default()).unwrap();
    }

    #[test]
    fn test_no_recreation_after_quit() {
        let mut fx = Fixture::new();
        fx.manager.create_main(RunMode::default()).unwrap();
        fx.manager.on_before_app_quit().unwrap();

        assert!(matches!(
            fx.manager.create_main(RunMode::default()),
            Err(LavernaError::WindowReleased)
        ));
        assert!(matches!(
            fx.manager.toggle_show(),
            Err(LavernaError::WindowReleased)
        ));
    }

    #[test]
    fn test_quit_while_maximized_keeps_normal_bounds() {
        let saved = WindowState {
            width: 1024.0,
            height: 700.0,
            x: Some(10.0),
            y: Some(10.0),
            is_maximized: false,
        };
        let mut fx = Fixture::with_state(Some(saved), Vec::new());
        fx.manager.create_main(RunMode::default()).unwrap();
        fx.window().with(|w| {
            w.maximized = true;
            w.bounds = Some(Bounds::new(0.0, 0.0, 1920.0, 1080.0));
        });

        fx.manager.on_before_app_quit().unwrap();

        let saved = fx.store.load(MAIN_WINDOW, WindowState::default()).unwrap();
        assert!(saved.is_maximized);
        assert_eq!((saved.width, saved.height), (1024.0, 700.0));
        assert_eq!(fx.manager.state(), &saved);
    }
}
