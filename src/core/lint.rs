//! Sanity checks for the server's own settings. The server silently falls
//! back to defaults on unparsable integers and crashes on unparsable floats,
//! so catching those here gives the operator a readable hint first.

use crate::core::environment::{PROPERTY_ID_KEY, REQUIRE_EXPLICIT_SITE_KEY};
use crate::domain::model::{Environment, LaunchWarning};

const BOOL_KEYS: [&str; 3] = ["ENABLE_GSC", "ENABLE_GA4", REQUIRE_EXPLICIT_SITE_KEY];
const INT_KEYS: [&str; 4] = [
    "DEFAULT_LOOKBACK_DAYS",
    "MIN_IMPRESSIONS_FOR_CTR_ACTION",
    "MIN_SESSIONS_FOR_CONVERSION_ACTION",
    "DEFAULT_MAX_ACTION_ITEMS",
];
const FLOAT_KEYS: [&str; 2] = ["TARGET_CTR", "TARGET_CONVERSION_RATE"];

const TRUE_VALUES: [&str; 4] = ["1", "true", "yes", "on"];
const FALSE_VALUES: [&str; 4] = ["0", "false", "no", "off"];

pub fn lint_server_settings(env: &Environment) -> Vec<LaunchWarning> {
    let mut warnings = Vec::new();
    let mut flag = |key: &str, value: &str, reason: &str| {
        warnings.push(LaunchWarning::SettingValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    for key in BOOL_KEYS {
        if let Some(value) = env.get(key) {
            if parse_bool(value).is_none() {
                flag(key, value, "not a boolean; the server treats it as false");
            }
        }
    }

    for key in INT_KEYS {
        if let Some(value) = env.get(key) {
            if value.trim().parse::<i64>().is_err() {
                flag(key, value, "not an integer; the server will use its default");
            }
        }
    }

    for key in FLOAT_KEYS {
        if let Some(value) = env.get(key) {
            if value.trim().parse::<f64>().is_err() {
                flag(key, value, "not a number; the server will fail to start");
            }
        }
    }

    if let Some(value) = env.get_non_empty(PROPERTY_ID_KEY) {
        if !is_property_id(value) {
            flag(
                PROPERTY_ID_KEY,
                value,
                "expected a numeric GA4 property id or properties/<id>",
            );
        }
    }

    let disabled = |key: &str| env.get(key).and_then(parse_bool) == Some(false);
    if disabled("ENABLE_GSC") && disabled("ENABLE_GA4") {
        flag(
            "ENABLE_GSC/ENABLE_GA4",
            "false",
            "both connectors are disabled; every tool call will fail",
        );
    }

    warnings
}

pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim().to_ascii_lowercase();
    if TRUE_VALUES.contains(&value.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn is_property_id(value: &str) -> bool {
    let id = value.strip_prefix("properties/").unwrap_or(value);
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}
