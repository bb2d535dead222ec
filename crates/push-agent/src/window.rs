//! Application windows and the redirect message exchanged with them.

use serde::{Deserialize, Serialize};
use url::Url;

pub const REDIRECT_PATH_ACTION: &str = "redirect-path";

/// An open application window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
    /// Whether the host can navigate this window in place.
    pub navigable: bool,
}

impl WindowClient {
    /// Windows showing an editor are never hijacked by a click.
    pub fn shows_editor(&self, marker: &str) -> bool {
        !marker.is_empty() && self.url.contains(marker)
    }
}

/// Message posted to a window that could not be navigated directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMessage {
    pub action: String,
    pub url: String,
}

impl WindowMessage {
    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            action: REDIRECT_PATH_ACTION.into(),
            url: url.into(),
        }
    }
}

/// Receiving side of [`WindowMessage`]: the URL a window at
/// `window_url` should navigate to, if any.
///
/// Only `redirect-path` messages pointing at the window's own origin
/// are honored.
pub fn redirect_target(message: &WindowMessage, window_url: &str) -> Option<Url> {
    if message.action != REDIRECT_PATH_ACTION {
        return None;
    }
    let current = Url::parse(window_url).ok()?;
    let target = current.join(&message.url).ok()?;
    (target.origin() == current.origin()).then_some(target)
}
