//! Portal REST client for web push notifications.
//!
//! Reads notification records and applies state changes (mark read,
//! application-defined actions) on behalf of the background agent.

pub mod api;

pub use api::{NotificationAction, NotificationRecord, PortalApiClient};

/// Reserved action name that marks a notification as read.
pub const MARK_READ_ACTION: &str = "markRead";

/// Unified error type for the portal-client crate.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("Portal API error (status {status}): {message}")]
    ApiError { status: u16, message: String },
}
