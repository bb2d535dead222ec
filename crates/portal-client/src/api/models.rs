//! Wire types returned by the portal notification endpoints.

use serde::{Deserialize, Serialize};

/// Server-side notification record, fetched by id.
///
/// Every optional field may be absent or falsy in the JSON; the
/// normalizer decides what reaches the display surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Filled from the request path; the portal does not echo it back.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub vibrate: Option<Vec<u32>>,
    #[serde(default)]
    pub renotify: bool,
    #[serde(default)]
    pub require_interaction: bool,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub actions: Option<Vec<NotificationAction>>,
    /// Path relative to the portal origin.
    #[serde(default)]
    pub url: Option<String>,
}

/// Action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}
