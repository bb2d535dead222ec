//! Notification descriptor normalizer.
//!
//! Converts a portal [`NotificationRecord`] into the `(title, options)`
//! pair handed to the notification surface. Optional fields that are
//! absent or falsy are left out of the options entirely: the platform
//! treats the presence of a field as meaningful.

use portal_client::{NotificationAction, NotificationRecord};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::payload::LegacyMessage;

/// Manifest icon endpoint used when a record carries no icon.
pub const DEFAULT_ICON_PATH: &str = "/pwa/rest/manifest/smallIcon?sizes=72x72";

/// Manifest image used by legacy messages without an icon.
pub const DEFAULT_LARGE_ICON_PATH: &str = "/pwa/rest/manifest/largeIcon?sizes=72x72";

const LEGACY_DEFAULT_TITLE: &str = "Something Has Happened";
const LEGACY_DEFAULT_BODY: &str = "Summary.";

/// Correlation payload stored on a displayed notification.
///
/// Not visible to the user; read back by the interaction handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    pub url: String,
}

/// Display options of a notification, serialized the way the platform
/// expects them (camelCase, absent fields omitted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renotify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CorrelationData>,
}

/// Normalized `(title, options)` pair ready to be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayDescriptor {
    pub title: String,
    pub options: NotificationOptions,
}

/// Normalization settings that do not depend on the record.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub origin: Url,
    pub default_icon_path: String,
    pub default_large_icon_path: String,
    /// Backfill a missing `badge` with the resolved icon.
    pub badge_falls_back_to_icon: bool,
}

impl NormalizerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            default_icon_path: DEFAULT_ICON_PATH.into(),
            default_large_icon_path: DEFAULT_LARGE_ICON_PATH.into(),
            badge_falls_back_to_icon: true,
        }
    }

    /// Origin without a trailing slash, e.g. `https://portal.example`.
    pub fn origin_prefix(&self) -> String {
        self.origin.origin().ascii_serialization()
    }

    /// Absolute URL for an origin-relative path; an empty path maps to `/`.
    pub fn absolute_url(&self, path: Option<&str>) -> String {
        let origin = self.origin_prefix();
        match path.filter(|p| !p.is_empty()) {
            None => format!("{origin}/"),
            Some(p) if p.starts_with('/') => format!("{origin}{p}"),
            Some(p) => format!("{origin}/{p}"),
        }
    }

    pub fn default_icon(&self) -> String {
        self.absolute_url(Some(&self.default_icon_path))
    }

    pub fn default_large_icon(&self) -> String {
        self.absolute_url(Some(&self.default_large_icon_path))
    }

    /// Normalize a record for a platform supporting `max_actions` buttons
    /// (0 when action buttons are not supported).
    pub fn normalize(&self, record: NotificationRecord, max_actions: usize) -> DisplayDescriptor {
        let icon = present(record.icon).unwrap_or_else(|| self.default_icon());
        let badge = present(record.badge)
            .or_else(|| self.badge_falls_back_to_icon.then(|| icon.clone()));
        let tag = present(record.tag);
        // renotify without a tag has nothing to re-alert on
        let renotify = (record.renotify && tag.is_some()).then_some(true);

        let actions = match record.actions {
            Some(mut actions) if max_actions > 0 && !actions.is_empty() => {
                actions.truncate(max_actions);
                Some(actions)
            }
            _ => None,
        };

        let data = CorrelationData {
            notification_id: Some(record.id),
            url: self.absolute_url(record.url.as_deref()),
        };

        DisplayDescriptor {
            title: record.title.unwrap_or_default(),
            options: NotificationOptions {
                body: present(record.body),
                icon,
                image: present(record.image),
                badge,
                lang: present(record.lang),
                dir: present(record.dir),
                tag,
                vibrate: record.vibrate.filter(|v| !v.is_empty()),
                renotify,
                require_interaction: record.require_interaction.then_some(true),
                silent: record.silent.then_some(true),
                actions,
                data: Some(data),
            },
        }
    }

    /// Build a descriptor for a self-contained legacy push message.
    pub fn normalize_legacy(&self, message: LegacyMessage) -> DisplayDescriptor {
        let supplied = present(message.icon);
        let icon = supplied.clone().unwrap_or_else(|| self.default_icon());
        let image = supplied.unwrap_or_else(|| self.default_large_icon());
        DisplayDescriptor {
            title: present(message.title).unwrap_or_else(|| LEGACY_DEFAULT_TITLE.into()),
            options: NotificationOptions {
                body: Some(present(message.message).unwrap_or_else(|| LEGACY_DEFAULT_BODY.into())),
                image: Some(image.clone()),
                badge: Some(image),
                icon,
                data: Some(CorrelationData {
                    notification_id: None,
                    url: self.absolute_url(message.path.as_deref()),
                }),
                ..Default::default()
            },
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
