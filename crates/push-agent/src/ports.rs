//! Host capability ports.
//!
//! The handlers only touch the outside world through these traits. A
//! production adapter binds them to the real host; [`crate::memory`]
//! binds them to in-process state.

use async_trait::async_trait;
use portal_client::NotificationRecord;

use crate::AgentError;
use crate::normalize::{DisplayDescriptor, NotificationOptions};
use crate::window::{WindowClient, WindowMessage};

/// Notification permission as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

impl Permission {
    pub fn from_str_setting(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Default,
        }
    }
}

/// Host-assigned identity of a displayed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationHandle(pub u64);

/// A member of the outstanding notification set.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotification {
    pub handle: NotificationHandle,
    pub title: String,
    pub options: NotificationOptions,
}

impl ShownNotification {
    /// The notification id this notification was rendered from.
    ///
    /// Read from the correlation payload, falling back to `tag` for
    /// notifications rendered without one.
    pub fn correlation_id(&self) -> Option<&str> {
        self.options
            .data
            .as_ref()
            .and_then(|d| d.notification_id.as_deref())
            .or(self.options.tag.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Click target stored in the correlation payload.
    pub fn target_url(&self) -> Option<&str> {
        self.options.data.as_ref().map(|d| d.url.as_str())
    }
}

#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn permission(&self) -> Permission;
}

/// Show, enumerate and close OS notifications.
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    /// Maximum number of action buttons; 0 when unsupported.
    fn max_actions(&self) -> usize;

    async fn show(&self, descriptor: &DisplayDescriptor) -> Result<NotificationHandle, AgentError>;

    /// Current outstanding notification set.
    async fn notifications(&self) -> Result<Vec<ShownNotification>, AgentError>;

    /// Closing an already closed notification is not an error.
    async fn close(&self, handle: NotificationHandle) -> Result<(), AgentError>;
}

/// Application icon badge.
#[async_trait]
pub trait AppBadge: Send + Sync {
    async fn set(&self, count: usize) -> Result<(), AgentError>;

    /// Remove the badge entirely; distinct from `set(0)`.
    async fn clear(&self) -> Result<(), AgentError>;
}

/// Enumerate, focus, navigate and open application windows.
#[async_trait]
pub trait WindowManager: Send + Sync {
    async fn windows(&self) -> Result<Vec<WindowClient>, AgentError>;

    async fn focus(&self, window: &WindowClient) -> Result<(), AgentError>;

    async fn navigate(&self, window: &WindowClient, url: &str) -> Result<(), AgentError>;

    async fn post_message(
        &self,
        window: &WindowClient,
        message: &WindowMessage,
    ) -> Result<(), AgentError>;

    async fn open_window(&self, url: &str) -> Result<(), AgentError>;
}

/// Remote notification state (read a record, apply an action).
#[async_trait]
pub trait RemoteState: Send + Sync {
    /// `Ok(None)` when the portal has nothing to render for this id.
    async fn fetch_record(
        &self,
        notification_id: &str,
    ) -> Result<Option<NotificationRecord>, AgentError>;

    async fn patch_state(&self, notification_id: &str, action: &str) -> Result<(), AgentError>;
}
