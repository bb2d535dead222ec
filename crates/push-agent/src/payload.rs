//! Push payload grammar.
//!
//! ```text
//! payload  = legacy / command
//! command  = id ":" action
//! action   = "open" / "close" / "closeAll"
//! legacy   = JSON object { title, message, icon, path }
//! ```
//!
//! The id segment of `closeAll` is ignored. Anything else is
//! [`PushCommand::Malformed`] and handled as a no-op.

use serde::{Deserialize, Serialize};

pub const ACTION_OPEN: &str = "open";
pub const ACTION_CLOSE: &str = "close";
pub const ACTION_CLOSE_ALL: &str = "closeAll";

/// Decoded push instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushCommand {
    CloseAll,
    Close(String),
    Open(String),
    Legacy(LegacyMessage),
    Malformed,
}

/// Self-contained notification pushed by older portal versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMessage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl PushCommand {
    /// Parse the text of a push message. `None` means the push carried no data.
    pub fn parse(payload: Option<&str>) -> Self {
        let Some(text) = payload.map(str::trim) else {
            return Self::Malformed;
        };
        if text.starts_with('{') {
            return match serde_json::from_str::<LegacyMessage>(text) {
                Ok(message) => Self::Legacy(message),
                Err(e) => {
                    tracing::debug!(error = %e, "Push payload is not a valid legacy message");
                    Self::Malformed
                }
            };
        }

        let mut segments = text.split(':');
        let (Some(id), Some(action), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Self::Malformed;
        };

        match action {
            ACTION_CLOSE_ALL => Self::CloseAll,
            ACTION_CLOSE if !id.is_empty() => Self::Close(id.to_string()),
            ACTION_OPEN if !id.is_empty() => Self::Open(id.to_string()),
            _ => Self::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_payloads() {
        assert_eq!(PushCommand::parse(Some("42:open")), PushCommand::Open("42".into()));
        assert_eq!(PushCommand::parse(Some("42:close")), PushCommand::Close("42".into()));
        assert_eq!(PushCommand::parse(Some("123456:closeAll")), PushCommand::CloseAll);
        assert_eq!(PushCommand::parse(Some(":closeAll")), PushCommand::CloseAll);
    }

    #[test]
    fn rejects_malformed_payloads() {
        for payload in ["", "42", "42:", ":open", ":close", "42:delete", "42:open:extra", "42:OPEN"] {
            assert_eq!(PushCommand::parse(Some(payload)), PushCommand::Malformed, "{payload}");
        }
        assert_eq!(PushCommand::parse(None), PushCommand::Malformed);
        assert_eq!(PushCommand::parse(Some("{not json")), PushCommand::Malformed);
    }

    #[test]
    fn parses_legacy_json_payload() {
        let command = PushCommand::parse(Some(r#"{"title":"Hi","path":"/portal/x"}"#));
        assert_eq!(
            command,
            PushCommand::Legacy(LegacyMessage {
                title: Some("Hi".into()),
                message: None,
                icon: None,
                path: Some("/portal/x".into()),
            })
        );
    }
}
