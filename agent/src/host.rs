//! Headless host: host events as JSON lines.
//!
//! ```text
//! {"type":"push","data":"42:open"}
//! {"type":"click","id":"42","action":"snooze"}
//! {"type":"close","id":"42"}
//! {"type":"window","url":"https://portal.example/portal/home","navigable":true}
//! {"type":"status"}
//! ```
//!
//! Every push, click and close is dispatched as its own task, so
//! invocations overlap the way they do on a real host. A user can only
//! click or dismiss what is already on screen, so commands that refer to
//! displayed notifications wait for the invocations dispatched before them.

use std::sync::Arc;

use push_agent::memory::MemoryHost;
use push_agent::ports::NotificationPlatform;
use push_agent::{Agent, EventOutcome, HostEvent};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

/// One line of host input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostCommand {
    /// Inbound push message; `data` is the payload text.
    Push {
        #[serde(default)]
        data: Option<String>,
    },
    /// Click on the notification correlated with `id`.
    Click {
        id: String,
        #[serde(default)]
        action: Option<String>,
    },
    /// User dismissed the notification correlated with `id`.
    Close { id: String },
    /// Register an open application window.
    Window {
        url: String,
        #[serde(default = "default_navigable")]
        navigable: bool,
    },
    /// Log the outstanding notifications, badge and windows.
    Status,
}

fn default_navigable() -> bool {
    true
}

impl HostCommand {
    /// Whether the command reads the displayed notification set.
    fn observes_tray(&self) -> bool {
        matches!(self, Self::Click { .. } | Self::Close { .. } | Self::Status)
    }
}

/// Resolve a command into a host event. Clicks and closes refer to a
/// displayed notification; `None` means there was nothing to dispatch.
pub async fn resolve(host: &MemoryHost, command: HostCommand) -> Option<HostEvent> {
    match command {
        HostCommand::Push { data } => Some(HostEvent::Push { payload: data }),
        HostCommand::Click { id, action } => {
            let Some(notification) = host.find_by_correlation(&id) else {
                tracing::warn!(notification_id = %id, "Click on unknown notification");
                return None;
            };
            Some(HostEvent::NotificationClick {
                notification,
                action,
            })
        }
        HostCommand::Close { id } => {
            let Some(notification) = host.find_by_correlation(&id) else {
                tracing::warn!(notification_id = %id, "Close of unknown notification");
                return None;
            };
            // the platform closes a dismissed notification before notifying
            if let Err(e) = host.close(notification.handle).await {
                tracing::warn!(error = %e, "Failed to close dismissed notification");
            }
            Some(HostEvent::NotificationClose { notification })
        }
        HostCommand::Window { url, navigable } => {
            let id = host.add_window(&url, navigable);
            tracing::info!(window = %id, url = %url, "Window registered");
            None
        }
        HostCommand::Status => {
            log_status(host);
            None
        }
    }
}

fn log_status(host: &MemoryHost) {
    let shown = host.shown();
    tracing::info!(
        outstanding = shown.len(),
        badge = ?host.badge_value(),
        "Host status"
    );
    for notification in shown {
        tracing::info!(
            handle = notification.handle.0,
            notification_id = ?notification.correlation_id(),
            title = %notification.title,
            "Outstanding notification"
        );
    }
}

/// Read commands until EOF, dispatching each event concurrently, then
/// wait for every in-flight invocation to settle.
pub async fn run_event_loop<R>(agent: Agent, host: Arc<MemoryHost>, reader: R) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();
    let mut dispatched = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: HostCommand = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, line, "Skipping unreadable host command");
                continue;
            }
        };

        if command.observes_tray() {
            settle(&mut tasks).await;
        }
        let Some(event) = resolve(&host, command).await else {
            continue;
        };
        let agent = agent.clone();
        dispatched += 1;
        tasks.spawn(async move { agent.dispatch(event).await });
    }

    settle(&mut tasks).await;
    log_status(&host);
    Ok(dispatched)
}

/// Wait for every in-flight invocation.
async fn settle(tasks: &mut JoinSet<EventOutcome>) {
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(outcome) => tracing::info!(?outcome, "Event handled"),
            Err(e) => tracing::error!(error = %e, "Event task aborted"),
        }
    }
}
