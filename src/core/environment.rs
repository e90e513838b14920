//! Child-process environment preparation: stale-state hygiene, env file
//! loading, placeholder checks and the site URL rewrite.

use crate::core::site::{is_valid_domain_property, normalize_site_url};
use crate::core::PLACEHOLDER_MARKER;
use crate::domain::model::{Environment, LaunchWarning};
use std::path::Path;

pub const SITE_URL_KEY: &str = "DEFAULT_GSC_SITE_URL";
pub const PROPERTY_ID_KEY: &str = "DEFAULT_GA4_PROPERTY_ID";
pub const REQUIRE_EXPLICIT_SITE_KEY: &str = "REQUIRE_EXPLICIT_GSC_SITE_URL";
pub const SERVICE_ACCOUNT_FILE_KEY: &str = "GOOGLE_SERVICE_ACCOUNT_FILE";
pub const APPLICATION_CREDENTIALS_KEY: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Credential variables that must come from the env file, never from the
/// invoking shell.
pub const STALE_KEYS: [&str; 2] = [APPLICATION_CREDENTIALS_KEY, SERVICE_ACCOUNT_FILE_KEY];

const PLACEHOLDER_CHECKED_KEYS: [&str; 2] = [SITE_URL_KEY, PROPERTY_ID_KEY];

/// Removes inherited credential variables; returns the keys that were set.
pub fn clear_stale_credentials(env: &mut Environment) -> Vec<&'static str> {
    STALE_KEYS
        .into_iter()
        .filter(|key| env.remove(key).is_some())
        .collect()
}

/// Env file entries win over inherited values.
pub fn apply_env_file(env: &mut Environment, pairs: Vec<(String, String)>) {
    for (key, value) in pairs {
        env.set(key, value);
    }
}

pub fn placeholder_warnings(env: &Environment, env_file: &Path) -> Vec<LaunchWarning> {
    PLACEHOLDER_CHECKED_KEYS
        .into_iter()
        .filter(|key| {
            env.get(key)
                .is_some_and(|value| value.starts_with(PLACEHOLDER_MARKER))
        })
        .map(|key| LaunchWarning::PlaceholderValue {
            key: key.to_string(),
            env_file: env_file.to_path_buf(),
        })
        .collect()
}

/// Rewrites the site URL as a domain property. Returns the exported value,
/// if any.
pub fn normalize_site_setting(env: &mut Environment, warnings: &mut Vec<LaunchWarning>) -> Option<String> {
    let raw = env.get_non_empty(SITE_URL_KEY)?.to_string();

    match normalize_site_url(&raw) {
        Some(site_url) => {
            if !is_valid_domain_property(&site_url) {
                warnings.push(LaunchWarning::SiteUrlNotADomain {
                    site_url: site_url.clone(),
                });
            }
            if site_url != raw {
                tracing::debug!("Normalized {} from '{}' to '{}'", SITE_URL_KEY, raw, site_url);
            }
            env.set(SITE_URL_KEY, &site_url);
            Some(site_url)
        }
        None => {
            warnings.push(LaunchWarning::SiteUrlUnusable { raw });
            None
        }
    }
}

/// With a default site configured, tools should not insist on an explicit
/// `site_url` argument unless the operator says otherwise.
pub fn default_explicit_site_flag(env: &mut Environment) -> bool {
    if env.get_non_empty(SITE_URL_KEY).is_none()
        || env.get_non_empty(REQUIRE_EXPLICIT_SITE_KEY).is_some()
    {
        return false;
    }
    env.set(REQUIRE_EXPLICIT_SITE_KEY, "false");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> Environment {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_clear_stale_credentials() {
        let mut env = env_of(&[
            (APPLICATION_CREDENTIALS_KEY, "/home/me/old.json"),
            ("PATH", "/usr/bin"),
        ]);
        assert_eq!(
            clear_stale_credentials(&mut env),
            vec![APPLICATION_CREDENTIALS_KEY]
        );
        assert!(!env.contains(APPLICATION_CREDENTIALS_KEY));
        assert_eq!(env.get("PATH"), Some("/usr/bin"));
    }

    #[test]
    fn test_env_file_overrides_inherited() {
        let mut env = env_of(&[(SITE_URL_KEY, "inherited.com")]);
        apply_env_file(
            &mut env,
            vec![(SITE_URL_KEY.to_string(), "from-file.com".to_string())],
        );
        assert_eq!(env.get(SITE_URL_KEY), Some("from-file.com"));
    }

    #[test]
    fn test_placeholder_warnings() {
        let env = env_of(&[
            (SITE_URL_KEY, "REPLACE_ME_with_your_site"),
            (PROPERTY_ID_KEY, "123456789"),
        ]);
        let warnings = placeholder_warnings(&env, Path::new("/srv/seo/config/.env"));
        assert_eq!(
            warnings,
            vec![LaunchWarning::PlaceholderValue {
                key: SITE_URL_KEY.to_string(),
                env_file: Path::new("/srv/seo/config/.env").to_path_buf(),
            }]
        );
    }

    #[test]
    fn test_normalize_site_setting_overwrites_value() {
        let mut env = env_of(&[(SITE_URL_KEY, "https://www.example.com/path?x=1")]);
        let mut warnings = Vec::new();
        let site = normalize_site_setting(&mut env, &mut warnings);

        assert_eq!(site.as_deref(), Some("sc-domain:example.com"));
        assert_eq!(env.get(SITE_URL_KEY), Some("sc-domain:example.com"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unset_site_exports_nothing() {
        let mut env = Environment::new();
        let mut warnings = Vec::new();
        assert!(normalize_site_setting(&mut env, &mut warnings).is_none());
        assert!(!default_explicit_site_flag(&mut env));
        assert!(!env.contains(SITE_URL_KEY));
        assert!(!env.contains(REQUIRE_EXPLICIT_SITE_KEY));
    }

    #[test]
    fn test_unusable_site_is_left_alone() {
        let mut env = env_of(&[(SITE_URL_KEY, "https://")]);
        let mut warnings = Vec::new();
        assert!(normalize_site_setting(&mut env, &mut warnings).is_none());
        assert_eq!(env.get(SITE_URL_KEY), Some("https://"));
        assert_eq!(
            warnings,
            vec![LaunchWarning::SiteUrlUnusable {
                raw: "https://".to_string()
            }]
        );
    }

    #[test]
    fn test_explicit_flag_defaults_only_when_unset() {
        let mut env = env_of(&[(SITE_URL_KEY, "sc-domain:example.com")]);
        assert!(default_explicit_site_flag(&mut env));
        assert_eq!(env.get(REQUIRE_EXPLICIT_SITE_KEY), Some("false"));

        let mut env = env_of(&[
            (SITE_URL_KEY, "sc-domain:example.com"),
            (REQUIRE_EXPLICIT_SITE_KEY, "true"),
        ]);
        assert!(!default_explicit_site_flag(&mut env));
        assert_eq!(env.get(REQUIRE_EXPLICIT_SITE_KEY), Some("true"));
    }
}
