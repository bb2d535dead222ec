//! Push event handler.
//!
//! One invocation per inbound push message:
//! `Received -> Authorized? -> Dispatched(action) -> {CloseAll, Close, Open} -> Terminal`.
//! Nothing survives between invocations; every step re-reads the live
//! notification set.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::AgentError;
use crate::badge::{BadgeSynchronizer, BadgeUpdate};
use crate::normalize::{DisplayDescriptor, NormalizerConfig};
use crate::payload::PushCommand;
use crate::ports::{NotificationPlatform, Permission, PermissionSource, RemoteState};

/// Terminal state of a push invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    PermissionDenied,
    /// Payload did not match the grammar.
    Ignored,
    ClosedAll {
        closed: usize,
        badge: Option<BadgeUpdate>,
    },
    Closed {
        found: bool,
        badge: Option<BadgeUpdate>,
    },
    /// The portal had no record to render.
    NotFound,
    Rendered {
        notification_id: Option<String>,
        badge: Option<BadgeUpdate>,
    },
    /// An unexpected failure was logged and the invocation abandoned.
    Failed,
}

#[derive(Clone)]
pub struct PushHandler {
    permission: Arc<dyn PermissionSource>,
    platform: Arc<dyn NotificationPlatform>,
    remote: Arc<dyn RemoteState>,
    normalizer: NormalizerConfig,
    badge: BadgeSynchronizer,
}

impl PushHandler {
    pub fn new(
        permission: Arc<dyn PermissionSource>,
        platform: Arc<dyn NotificationPlatform>,
        remote: Arc<dyn RemoteState>,
        normalizer: NormalizerConfig,
        badge: BadgeSynchronizer,
    ) -> Self {
        Self {
            permission,
            platform,
            remote,
            normalizer,
            badge,
        }
    }

    /// Handle one push message. Always resolves; failures are logged.
    pub async fn handle(&self, payload: Option<&str>) -> PushOutcome {
        if self.permission.permission().await != Permission::Granted {
            tracing::debug!("Notification permission not granted, ignoring push");
            return PushOutcome::PermissionDenied;
        }

        let command = PushCommand::parse(payload);
        match self.dispatch(command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, payload = ?payload, "Push handling failed");
                PushOutcome::Failed
            }
        }
    }

    async fn dispatch(&self, command: PushCommand) -> Result<PushOutcome, AgentError> {
        tracing::debug!(?command, "Dispatching push");
        match command {
            PushCommand::CloseAll => self.close_all().await,
            PushCommand::Close(id) => self.close(&id).await,
            PushCommand::Open(id) => self.open(&id).await,
            PushCommand::Legacy(message) => {
                let descriptor = self.normalizer.normalize_legacy(message);
                self.render(descriptor).await
            }
            PushCommand::Malformed => {
                tracing::warn!("Ignoring malformed push payload");
                Ok(PushOutcome::Ignored)
            }
        }
    }

    async fn close_all(&self) -> Result<PushOutcome, AgentError> {
        let shown = self.platform.notifications().await?;
        for notification in &shown {
            self.platform.close(notification.handle).await?;
        }
        tracing::info!(closed = shown.len(), "Closed all notifications");
        Ok(PushOutcome::ClosedAll {
            closed: shown.len(),
            badge: self.badge.refresh_logged().await,
        })
    }

    async fn close(&self, notification_id: &str) -> Result<PushOutcome, AgentError> {
        let shown = self.platform.notifications().await?;
        let Some(target) = shown
            .iter()
            .find(|n| n.correlation_id() == Some(notification_id))
        else {
            tracing::debug!(notification_id, "No displayed notification to close");
            return Ok(PushOutcome::Closed {
                found: false,
                badge: self.badge.refresh_logged().await,
            });
        };

        self.platform.close(target.handle).await?;
        tracing::info!(notification_id, "Notification closed by portal");
        Ok(PushOutcome::Closed {
            found: true,
            badge: self.badge.refresh_logged().await,
        })
    }

    async fn open(&self, notification_id: &str) -> Result<PushOutcome, AgentError> {
        let Some(record) = self.remote.fetch_record(notification_id).await? else {
            tracing::debug!(notification_id, "Nothing to render");
            return Ok(PushOutcome::NotFound);
        };

        let descriptor = self.normalizer.normalize(record, self.platform.max_actions());
        self.render(descriptor).await
    }

    async fn render(&self, descriptor: DisplayDescriptor) -> Result<PushOutcome, AgentError> {
        let notification_id = descriptor
            .options
            .data
            .as_ref()
            .and_then(|d| d.notification_id.clone());
        self.platform.show(&descriptor).await?;
        tracing::info!(notification_id = ?notification_id, "Notification rendered");

        let badge = self.badge.refresh_logged().await;
        Ok(PushOutcome::Rendered {
            notification_id,
            badge,
        })
    }
}
