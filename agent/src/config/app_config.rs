//! Runtime agent configuration loaded from resolved settings.

use push_agent::interaction::DEFAULT_EDITOR_MARKER;
use push_agent::normalize::{DEFAULT_ICON_PATH, DEFAULT_LARGE_ICON_PATH};
use push_agent::{AgentSettings, NormalizerConfig, Permission};
use url::Url;

use super::manager::SettingsManager;

/// Runtime configuration of the agent and its headless host.
#[derive(Clone)]
pub struct AgentConfig {
    pub origin: Url,
    pub rest_path: String,
    pub session_cookie: String,
    pub default_icon_path: String,
    pub default_large_icon_path: String,
    pub badge_falls_back_to_icon: bool,
    pub editor_path_marker: String,
    pub max_actions: usize,
    pub permission: Permission,
    pub badge_supported: bool,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("origin", &self.origin.as_str())
            .field("rest_path", &self.rest_path)
            .field("session_cookie", &(!self.session_cookie.is_empty()).then_some("********"))
            .field("default_icon_path", &self.default_icon_path)
            .field("default_large_icon_path", &self.default_large_icon_path)
            .field("badge_falls_back_to_icon", &self.badge_falls_back_to_icon)
            .field("editor_path_marker", &self.editor_path_marker)
            .field("max_actions", &self.max_actions)
            .field("permission", &self.permission)
            .field("badge_supported", &self.badge_supported)
            .finish()
    }
}

impl AgentConfig {
    /// Load configuration, rejecting missing or invalid settings.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let missing = sm.missing_required();
        if !missing.is_empty() {
            anyhow::bail!("missing required settings: {}", missing.join(", "));
        }
        let errors = sm.validation_errors();
        if !errors.is_empty() {
            anyhow::bail!("invalid settings: {}", errors.join("; "));
        }

        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };

        Ok(Self {
            origin: Url::parse(&g("PORTAL_ORIGIN"))?,
            rest_path: g("PORTAL_REST_PATH"),
            session_cookie: g("PORTAL_SESSION_COOKIE"),
            default_icon_path: {
                let p = g("PUSH_DEFAULT_ICON_PATH");
                if p.is_empty() { DEFAULT_ICON_PATH.into() } else { p }
            },
            default_large_icon_path: {
                let p = g("PUSH_DEFAULT_LARGE_ICON_PATH");
                if p.is_empty() { DEFAULT_LARGE_ICON_PATH.into() } else { p }
            },
            badge_falls_back_to_icon: g("PUSH_BADGE_FALLBACK_TO_ICON") == "true",
            editor_path_marker: {
                let m = g("PUSH_EDITOR_PATH_MARKER");
                if m.is_empty() { DEFAULT_EDITOR_MARKER.into() } else { m }
            },
            max_actions: g("PUSH_MAX_ACTIONS").parse().unwrap_or(2),
            permission: Permission::from_str_setting(&g("PUSH_PERMISSION")),
            badge_supported: g("PUSH_BADGE_SUPPORTED") == "true",
        })
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            origin: self.origin.clone(),
            default_icon_path: self.default_icon_path.clone(),
            default_large_icon_path: self.default_large_icon_path.clone(),
            badge_falls_back_to_icon: self.badge_falls_back_to_icon,
        }
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            normalizer: self.normalizer_config(),
            editor_path_marker: self.editor_path_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults_around_required_origin() {
        let sm = SettingsManager::from_pairs([("PORTAL_ORIGIN", "https://portal.example")]);
        let config = AgentConfig::load(&sm).unwrap();
        assert_eq!(config.origin.as_str(), "https://portal.example/");
        assert_eq!(config.rest_path, "/pwa/rest");
        assert!(config.badge_falls_back_to_icon);
        assert_eq!(config.max_actions, 2);
        assert_eq!(config.permission, Permission::Granted);
        assert_eq!(
            config.normalizer_config().default_icon(),
            "https://portal.example/pwa/rest/manifest/smallIcon?sizes=72x72"
        );
        assert_eq!(
            config.normalizer_config().default_large_icon(),
            "https://portal.example/pwa/rest/manifest/largeIcon?sizes=72x72"
        );
    }

    #[test]
    fn overrides_are_applied() {
        let sm = SettingsManager::from_pairs([
            ("PORTAL_ORIGIN", "http://localhost:8080"),
            ("PUSH_BADGE_FALLBACK_TO_ICON", "false"),
            ("PUSH_MAX_ACTIONS", "0"),
            ("PUSH_PERMISSION", "denied"),
            ("PUSH_EDITOR_PATH_MARKER", "/edit"),
        ]);
        let config = AgentConfig::load(&sm).unwrap();
        assert!(!config.badge_falls_back_to_icon);
        assert_eq!(config.max_actions, 0);
        assert_eq!(config.permission, Permission::Denied);
        assert_eq!(config.agent_settings().editor_path_marker, "/edit");
    }

    #[test]
    fn missing_origin_is_rejected() {
        let err = AgentConfig::load(&SettingsManager::from_pairs(Vec::<(String, String)>::new()))
            .unwrap_err();
        assert!(err.to_string().contains("PORTAL_ORIGIN"));
    }

    #[test]
    fn debug_output_masks_cookie() {
        let sm = SettingsManager::from_pairs([
            ("PORTAL_ORIGIN", "https://portal.example"),
            ("PORTAL_SESSION_COOKIE", "JSESSIONID=secret"),
        ]);
        let rendered = format!("{:?}", AgentConfig::load(&sm).unwrap());
        assert!(!rendered.contains("secret"));
    }
}
