//! Outbound navigation policy
//!
//! Pages loaded inside the main window may only navigate to the app's own
//! content. Anything else is cancelled and opened in the system browser.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::host::ExternalOpener;

const BLOB_SCHEME: &str = "blob:";

/// What to do with a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the webview load the URL
    Allow,
    /// Cancel it; the URL has been handed to the external opener
    Cancel,
}

impl NavigationDecision {
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

/// Which webview event produced a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// In-page navigation of the main window
    Navigate,
    /// A popup or `target="_blank"` link
    NewWindow,
}

/// URLs allowed to load inside the app window.
///
/// An entry matches when it appears anywhere in the URL, case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPolicy {
    allowed: Vec<String>,
}

impl UrlPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// `blob:` URLs and URLs matching an allow-list entry stay in the app
    pub fn is_allowed(&self, url: &str) -> bool {
        url.starts_with(BLOB_SCHEME)
            || self
                .allowed
                .iter()
                .any(|entry| url.contains(entry.as_str()))
    }
}

/// Shared between the window manager and the webview's navigation hooks.
///
/// The hooks are installed when the window is built but only intercept once
/// [`NavigationGuard::listen`] has been called.
pub struct NavigationGuard {
    policy: UrlPolicy,
    opener: Arc<dyn ExternalOpener>,
    listening: AtomicBool,
}

impl NavigationGuard {
    pub fn new(policy: UrlPolicy, opener: Arc<dyn ExternalOpener>) -> Self {
        Self {
            policy,
            opener,
            listening: AtomicBool::new(false),
        }
    }

    pub fn policy(&self) -> &UrlPolicy {
        &self.policy
    }

    /// Start intercepting. Returns `false` if already listening.
    pub fn listen(&self) -> bool {
        !self.listening.swap(true, Ordering::SeqCst)
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Apply the policy to `url`, opening it externally when it is not allowed
    pub fn handle_url(&self, url: &str) -> NavigationDecision {
        if self.policy.is_allowed(url) {
            debug!(url, "Navigation allowed");
            return NavigationDecision::Allow;
        }

        info!(url, "Opening URL in external handler");
        if let Err(e) = self.opener.open_external(url) {
            error!(url, "Failed to open URL externally: {}", e);
        }
        NavigationDecision::Cancel
    }

    /// Entry point for the webview hooks
    pub fn on_navigation(&self, kind: NavigationKind, url: &str) -> NavigationDecision {
        if !self.is_listening() {
            return NavigationDecision::Allow;
        }
        debug!(?kind, url, "Intercepted navigation");
        self.handle_url(url)
    }
}

impl std::fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("policy", &self.policy)
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}
