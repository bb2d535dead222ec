//! Badge synchronizer.
//!
//! The badge is always recomputed from the live outstanding set, never
//! from a local counter, so concurrent refreshes converge.

use std::sync::Arc;

use crate::AgentError;
use crate::ports::{AppBadge, NotificationPlatform};

/// What a refresh did to the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeUpdate {
    /// The host exposes no badge.
    Unsupported,
    Cleared,
    Set(usize),
}

#[derive(Clone)]
pub struct BadgeSynchronizer {
    platform: Arc<dyn NotificationPlatform>,
    badge: Option<Arc<dyn AppBadge>>,
}

impl BadgeSynchronizer {
    /// `badge` is `None` when the host has no badge capability.
    pub fn new(platform: Arc<dyn NotificationPlatform>, badge: Option<Arc<dyn AppBadge>>) -> Self {
        Self { platform, badge }
    }

    /// Set the badge to the size of the outstanding set, or clear it
    /// when the set is empty.
    pub async fn refresh(&self) -> Result<BadgeUpdate, AgentError> {
        let Some(badge) = &self.badge else {
            return Ok(BadgeUpdate::Unsupported);
        };

        let count = self.platform.notifications().await?.len();
        if count == 0 {
            badge.clear().await?;
            tracing::debug!("Badge cleared");
            Ok(BadgeUpdate::Cleared)
        } else {
            badge.set(count).await?;
            tracing::debug!(count, "Badge updated");
            Ok(BadgeUpdate::Set(count))
        }
    }

    /// [`Self::refresh`] with failures logged instead of returned.
    pub async fn refresh_logged(&self) -> Option<BadgeUpdate> {
        match self.refresh().await {
            Ok(update) => Some(update),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh badge");
                None
            }
        }
    }
}
