//! Background push-notification agent.
//!
//! Turns inbound push payloads into displayed notifications and routes
//! user interaction with them back to application windows and to the
//! portal's read/unread state, keeping the app badge in sync with the
//! set of outstanding notifications.
//!
//! Every host capability is reached through the traits in [`ports`], so
//! the handlers run unchanged against a real host or [`memory::MemoryHost`].

pub mod badge;
pub mod dispatch;
pub mod interaction;
pub mod memory;
pub mod normalize;
pub mod payload;
pub mod ports;
pub mod push;
pub mod remote;
pub mod window;

pub use badge::{BadgeSynchronizer, BadgeUpdate};
pub use dispatch::{Agent, AgentSettings, EventOutcome, HostEvent, HostPorts};
pub use interaction::{ClickRoute, InteractionHandler, InteractionKind, InteractionOutcome};
pub use normalize::{CorrelationData, DisplayDescriptor, NormalizerConfig, NotificationOptions};
pub use payload::{LegacyMessage, PushCommand};
pub use ports::{NotificationHandle, Permission, ShownNotification};
pub use push::{PushHandler, PushOutcome};
pub use window::{WindowClient, WindowMessage};

use portal_client::PortalError;

/// Error raised by a host port or the remote state client.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Remote state request failed: {0}")]
    Remote(#[from] PortalError),

    #[error("Notification platform error: {0}")]
    Platform(String),

    #[error("Window client error: {0}")]
    Window(String),
}
