//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

const DEFS: &[DefTuple] = &[
    ("PORTAL_ORIGIN", "", false, true, "Absolute origin of the portal"),
    ("PORTAL_REST_PATH", "/pwa/rest", false, false, "REST prefix of the PWA endpoints"),
    ("PORTAL_SESSION_COOKIE", "", true, false, "Cookie header sent with every portal request"),
    (
        "PUSH_DEFAULT_ICON_PATH",
        "/pwa/rest/manifest/smallIcon?sizes=72x72",
        false,
        false,
        "Icon used when a notification has none",
    ),
    (
        "PUSH_DEFAULT_LARGE_ICON_PATH",
        "/pwa/rest/manifest/largeIcon?sizes=72x72",
        false,
        false,
        "Image used by legacy messages without an icon",
    ),
    ("PUSH_BADGE_FALLBACK_TO_ICON", "true", false, false, "Use the icon as badge when none is set"),
    ("PUSH_EDITOR_PATH_MARKER", "editor", false, false, "Windows whose URL contains this are not reused"),
    ("PUSH_MAX_ACTIONS", "2", false, false, "Action buttons supported by the host (0 = none)"),
    ("PUSH_PERMISSION", "granted", false, false, "Notification permission reported by the host"),
    ("PUSH_BADGE_SUPPORTED", "true", false, false, "Whether the host exposes an app badge"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});

