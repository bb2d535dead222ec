//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_ABSOLUTE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9/_\-.~%?=&]*$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "PORTAL_ORIGIN" => {
            let url = url::Url::parse(value).map_err(|e| format!("invalid URL: {e}"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err("must be an http or https origin".into());
            }
            if url.path() != "/" || url.query().is_some() {
                return Err("must be an origin without path or query".into());
            }
        }
        "PORTAL_REST_PATH" | "PUSH_DEFAULT_ICON_PATH" | "PUSH_DEFAULT_LARGE_ICON_PATH" => {
            if !RE_ABSOLUTE_PATH.is_match(value) {
                return Err("must be an absolute path starting with '/'".into());
            }
        }
        "PUSH_MAX_ACTIONS" => validate_int_range(value, 0, 10)?,
        "PUSH_PERMISSION" => {
            if !["granted", "denied", "default"].contains(&value) {
                return Err("must be granted, denied, or default".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "PUSH_BADGE_FALLBACK_TO_ICON" | "PUSH_BADGE_SUPPORTED")
}
