//! Event dispatcher keyed by host event kind.

use std::sync::Arc;

use crate::badge::BadgeSynchronizer;
use crate::interaction::{DEFAULT_EDITOR_MARKER, InteractionHandler, InteractionKind, InteractionOutcome};
use crate::normalize::NormalizerConfig;
use crate::ports::{
    AppBadge, NotificationPlatform, PermissionSource, RemoteState, ShownNotification,
    WindowManager,
};
use crate::push::{PushHandler, PushOutcome};

/// Capabilities the host provides to the agent.
#[derive(Clone)]
pub struct HostPorts {
    pub permission: Arc<dyn PermissionSource>,
    pub notifications: Arc<dyn NotificationPlatform>,
    /// `None` when the host has no app badge.
    pub badge: Option<Arc<dyn AppBadge>>,
    pub windows: Arc<dyn WindowManager>,
    pub remote: Arc<dyn RemoteState>,
}

/// Agent behavior settings.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub normalizer: NormalizerConfig,
    pub editor_path_marker: String,
}

impl AgentSettings {
    pub fn new(normalizer: NormalizerConfig) -> Self {
        Self {
            normalizer,
            editor_path_marker: DEFAULT_EDITOR_MARKER.into(),
        }
    }
}

/// An event delivered by the host.
#[derive(Debug, Clone)]
pub enum HostEvent {
    Push { payload: Option<String> },
    NotificationClick {
        notification: ShownNotification,
        action: Option<String>,
    },
    NotificationClose { notification: ShownNotification },
}

impl HostEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::NotificationClick { .. } => "notificationclick",
            Self::NotificationClose { .. } => "notificationclose",
        }
    }
}

/// Completion value of a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Push(PushOutcome),
    Interaction(InteractionOutcome),
}

impl From<PushOutcome> for EventOutcome {
    fn from(outcome: PushOutcome) -> Self {
        Self::Push(outcome)
    }
}

impl From<InteractionOutcome> for EventOutcome {
    fn from(outcome: InteractionOutcome) -> Self {
        Self::Interaction(outcome)
    }
}

/// The background agent: one handler per event kind, sharing the ports.
#[derive(Clone)]
pub struct Agent {
    push: PushHandler,
    interaction: InteractionHandler,
}

impl Agent {
    pub fn new(ports: HostPorts, settings: AgentSettings) -> Self {
        let badge = BadgeSynchronizer::new(ports.notifications.clone(), ports.badge.clone());
        let fallback_url = settings.normalizer.absolute_url(None);
        let push = PushHandler::new(
            ports.permission,
            ports.notifications.clone(),
            ports.remote.clone(),
            settings.normalizer,
            badge.clone(),
        );
        let interaction = InteractionHandler::new(
            ports.notifications,
            ports.windows,
            ports.remote,
            badge,
            fallback_url,
        )
        .with_editor_marker(settings.editor_path_marker);
        Self { push, interaction }
    }

    pub fn push_handler(&self) -> &PushHandler {
        &self.push
    }

    pub fn interaction_handler(&self) -> &InteractionHandler {
        &self.interaction
    }

    /// Run the handler for `event` to completion.
    pub async fn dispatch(&self, event: HostEvent) -> EventOutcome {
        let kind = event.kind();
        tracing::debug!(kind, "Dispatching host event");
        let outcome = match event {
            HostEvent::Push { payload } => self.push.handle(payload.as_deref()).await.into(),
            HostEvent::NotificationClick {
                notification,
                action,
            } => self
                .interaction
                .handle(&notification, InteractionKind::Click { action })
                .await
                .into(),
            HostEvent::NotificationClose { notification } => self
                .interaction
                .handle(&notification, InteractionKind::Dismiss)
                .await
                .into(),
        };
        tracing::debug!(kind, ?outcome, "Host event completed");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use portal_client::NotificationRecord;
    use url::Url;

    use super::*;
    use crate::badge::BadgeUpdate;
    use crate::interaction::ClickRoute;
    use crate::memory::{MemoryHost, MemoryRemote, WindowEvent};

    fn agent(host: &Arc<MemoryHost>, remote: &Arc<MemoryRemote>) -> Agent {
        let ports = HostPorts {
            permission: host.clone(),
            notifications: host.clone(),
            badge: Some(host.clone()),
            windows: host.clone(),
            remote: remote.clone(),
        };
        let settings = AgentSettings::new(NormalizerConfig::new(
            Url::parse("https://portal.example").unwrap(),
        ));
        Agent::new(ports, settings)
    }

    #[tokio::test]
    async fn push_then_click_round_trip() {
        let host = Arc::new(MemoryHost::new());
        let remote = Arc::new(MemoryRemote::new());
        remote.insert(NotificationRecord {
            id: "42".into(),
            title: Some("Kudos".into()),
            url: Some("/portal/kudos".into()),
            ..Default::default()
        });
        let agent = agent(&host, &remote);

        let outcome = agent
            .dispatch(HostEvent::Push {
                payload: Some("42:open".into()),
            })
            .await;
        assert!(matches!(
            outcome,
            EventOutcome::Push(PushOutcome::Rendered { .. })
        ));
        assert_eq!(host.badge_value(), Some(1));

        let notification = host.find_by_correlation("42").unwrap();
        let outcome = agent
            .dispatch(HostEvent::NotificationClick {
                notification,
                action: None,
            })
            .await;
        assert_eq!(
            outcome,
            EventOutcome::Interaction(InteractionOutcome::Handled {
                correlation_id: Some("42".into()),
                route: Some(ClickRoute::OpenedWindow),
                marked_read: true,
                badge: Some(BadgeUpdate::Cleared),
            })
        );
        assert_eq!(
            host.window_events(),
            vec![WindowEvent::Opened("https://portal.example/portal/kudos".into())]
        );
        assert_eq!(host.badge_value(), None);
    }

    #[tokio::test]
    async fn concurrent_pushes_converge_on_badge() {
        let host = Arc::new(MemoryHost::new());
        let remote = Arc::new(MemoryRemote::new());
        for id in ["1", "2", "3"] {
            remote.insert(NotificationRecord {
                id: id.into(),
                ..Default::default()
            });
        }
        let agent = agent(&host, &remote);

        let mut tasks = Vec::new();
        for id in ["1", "2", "3"] {
            let agent = agent.clone();
            tasks.push(tokio::spawn(async move {
                agent
                    .dispatch(HostEvent::Push {
                        payload: Some(format!("{id}:open")),
                    })
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(host.badge_value(), Some(3));

        let outcome = agent
            .dispatch(HostEvent::Push {
                payload: Some("2:close".into()),
            })
            .await;
        assert_eq!(
            outcome,
            EventOutcome::Push(PushOutcome::Closed {
                found: true,
                badge: Some(BadgeUpdate::Set(2)),
            })
        );
        assert_eq!(host.badge_value(), Some(2));
    }
}
