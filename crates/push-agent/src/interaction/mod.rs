//! Notification interaction handler (click and dismiss).
//!
//! `Triggered -> ResolveCorrelation -> {ActionBranch | ClickBranch} -> Cleanup -> Terminal`
//!
//! Cleanup marks the notification read and refreshes the badge. It runs
//! after every click and dismiss that resolved a correlation id, no
//! matter how the branch before it ended.


use std::sync::Arc;

use portal_client::MARK_READ_ACTION;

use crate::AgentError;
use crate::badge::{BadgeSynchronizer, BadgeUpdate};
use crate::ports::{NotificationPlatform, RemoteState, ShownNotification, WindowManager};
use crate::window::{WindowClient, WindowMessage};

/// Default substring identifying windows that show an editor.
pub const DEFAULT_EDITOR_MARKER: &str = "editor";

/// What the user did with the notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    /// `action` is the id of the pressed action button, if any.
    Click { action: Option<String> },
    Dismiss,
}

/// Where a click ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickRoute {
    /// An action button was forwarded to the portal.
    Action { action: String, applied: bool },
    Navigated { window: String },
    RedirectMessage { window: String },
    OpenedWindow,
    /// Every fallback failed.
    Unrouted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Dismissal of a notification with no correlation id.
    Ignored,
    Handled {
        correlation_id: Option<String>,
        route: Option<ClickRoute>,
        marked_read: bool,
        badge: Option<BadgeUpdate>,
    },
}

#[derive(Clone)]
pub struct InteractionHandler {
    platform: Arc<dyn NotificationPlatform>,
    windows: Arc<dyn WindowManager>,
    remote: Arc<dyn RemoteState>,
    badge: BadgeSynchronizer,
    editor_marker: String,
    fallback_url: String,
}

impl InteractionHandler {
    /// `fallback_url` is opened for notifications that carry no target.
    pub fn new(
        platform: Arc<dyn NotificationPlatform>,
        windows: Arc<dyn WindowManager>,
        remote: Arc<dyn RemoteState>,
        badge: BadgeSynchronizer,
        fallback_url: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            windows,
            remote,
            badge,
            editor_marker: DEFAULT_EDITOR_MARKER.into(),
            fallback_url: fallback_url.into(),
        }
    }

    pub fn with_editor_marker(mut self, marker: impl Into<String>) -> Self {
        self.editor_marker = marker.into();
        self
    }

    /// Handle one click or dismissal. Always resolves.
    pub async fn handle(
        &self,
        notification: &ShownNotification,
        kind: InteractionKind,
    ) -> InteractionOutcome {
        let correlation_id = notification.correlation_id().map(str::to_owned);

        let route = match kind {
            InteractionKind::Dismiss => {
                if correlation_id.is_none() {
                    tracing::debug!("Dismissed notification has no correlation id");
                    return InteractionOutcome::Ignored;
                }
                None
            }
            InteractionKind::Click { action } => {
                if let Err(e) = self.platform.close(notification.handle).await {
                    tracing::warn!(error = %e, "Failed to close clicked notification");
                }
                let action = action.filter(|a| !a.is_empty());
                let route = match action {
                    Some(action) => self.apply_action(correlation_id.as_deref(), action).await,
                    None => {
                        let url = notification.target_url().unwrap_or(&self.fallback_url);
                        self.route_click(url).await
                    }
                };
                Some(route)
            }
        };

        let marked_read = match &correlation_id {
            Some(id) => self.mark_read(id).await,
            None => false,
        };
        let badge = self.badge.refresh_logged().await;

        InteractionOutcome::Handled {
            correlation_id,
            route,
            marked_read,
            badge,
        }
    }

    async fn apply_action(&self, correlation_id: Option<&str>, action: String) -> ClickRoute {
        let Some(id) = correlation_id else {
            tracing::warn!(action = %action, "Action pressed on a notification without correlation id");
            return ClickRoute::Action {
                action,
                applied: false,
            };
        };

        let applied = match self.remote.patch_state(id, &action).await {
            Ok(()) => {
                tracing::info!(notification_id = id, action = %action, "Notification action applied");
                true
            }
            Err(e) => {
                tracing::warn!(
                    notification_id = id,
                    action = %action,
                    error = %e,
                    "Failed to apply notification action"
                );
                false
            }
        };
        ClickRoute::Action { action, applied }
    }

    async fn mark_read(&self, notification_id: &str) -> bool {
        match self.remote.patch_state(notification_id, MARK_READ_ACTION).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(notification_id, error = %e, "Failed to mark notification as read");
                false
            }
        }
    }

    async fn route_click(&self, url: &str) -> ClickRoute {
        match self.try_route_click(url).await {
            Ok(route) => route,
            Err(e) => {
                tracing::error!(url, error = %e, "Failed to route notification click");
                ClickRoute::Unrouted
            }
        }
    }

    /// Reuse the first window not showing an editor; otherwise open one.
    /// Fallbacks: navigate -> redirect message -> new window.
    async fn try_route_click(&self, url: &str) -> Result<ClickRoute, AgentError> {
        let windows = self.windows.windows().await?;
        let Some(window) = windows
            .into_iter()
            .find(|w| !w.shows_editor(&self.editor_marker))
        else {
            return self.open_window(url).await;
        };

        if let Err(e) = self.windows.focus(&window).await {
            tracing::warn!(window = %window.id, error = %e, "Failed to focus window");
            return self.open_window(url).await;
        }

        if window.navigable {
            match self.windows.navigate(&window, url).await {
                Ok(()) => {
                    tracing::info!(window = %window.id, url, "Navigated window");
                    return Ok(ClickRoute::Navigated { window: window.id });
                }
                Err(e) => {
                    tracing::warn!(window = %window.id, error = %e, "Navigation failed, posting redirect");
                }
            }
        }

        self.post_redirect(window, url).await
    }

    async fn post_redirect(&self, window: WindowClient, url: &str) -> Result<ClickRoute, AgentError> {
        match self
            .windows
            .post_message(&window, &WindowMessage::redirect(url))
            .await
        {
            Ok(()) => {
                tracing::info!(window = %window.id, url, "Posted redirect message");
                Ok(ClickRoute::RedirectMessage { window: window.id })
            }
            Err(e) => {
                tracing::warn!(window = %window.id, error = %e, "Redirect message failed");
                self.open_window(url).await
            }
        }
    }

    async fn open_window(&self, url: &str) -> Result<ClickRoute, AgentError> {
        self.windows.open_window(url).await?;
        tracing::info!(url, "Opened new window");
        Ok(ClickRoute::OpenedWindow)
    }
}
