use crate::config::join_root;
use crate::core::PLACEHOLDER_MARKER;
use crate::domain::model::LaunchWarning;
use crate::utils::error::{LaunchError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSource {
    Default,
    Override,
    /// The override did not exist, so the default was used instead.
    FallbackToDefault { requested: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub path: PathBuf,
    pub source: CredentialsSource,
}

impl ResolvedCredentials {
    pub fn warning(&self) -> Option<LaunchWarning> {
        match &self.source {
            CredentialsSource::FallbackToDefault { requested } => {
                Some(LaunchWarning::CredentialsFallback {
                    requested: requested.clone(),
                    fallback: self.path.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Picks the service account file: the override if given, otherwise the
/// default. Relative paths are taken from `root`. A missing override falls
/// back to the default when the default exists.
pub fn resolve_credentials_path(
    override_value: Option<&str>,
    default_path: &Path,
    root: &Path,
) -> ResolvedCredentials {
    let default_path = join_root(root, default_path);
    let Some(requested) = override_value.filter(|v| !v.is_empty()) else {
        return ResolvedCredentials {
            path: default_path,
            source: CredentialsSource::Default,
        };
    };

    let requested = join_root(root, requested);
    if requested == default_path {
        return ResolvedCredentials {
            path: default_path,
            source: CredentialsSource::Default,
        };
    }

    if !requested.exists() && default_path.exists() {
        return ResolvedCredentials {
            path: default_path,
            source: CredentialsSource::FallbackToDefault { requested },
        };
    }

    ResolvedCredentials {
        path: requested,
        source: CredentialsSource::Override,
    }
}

/// Fails if the file is missing or still holds the placeholder token.
/// Structural problems with the JSON are only reported as warnings; the
/// Google client library gives the authoritative error later.
pub fn validate_credentials_file(path: &Path) -> Result<Vec<LaunchWarning>> {
    if !path.is_file() {
        return Err(LaunchError::CredentialsMissing {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&content);
    if text.contains(PLACEHOLDER_MARKER) {
        return Err(LaunchError::CredentialsPlaceholder {
            path: path.to_path_buf(),
        });
    }

    Ok(inspect_service_account(path, &text))
}

fn inspect_service_account(path: &Path, text: &str) -> Vec<LaunchWarning> {
    let shape = |detail: &str| LaunchWarning::CredentialsShape {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    };

    let json: serde_json::Value = match serde_json::from_str(text) {
        Ok(json) => json,
        Err(e) => return vec![shape(&format!("not valid JSON ({})", e))],
    };

    let mut warnings = Vec::new();
    match json.get("type").and_then(|t| t.as_str()) {
        Some("service_account") => {}
        Some(other) => warnings.push(shape(&format!(
            "credential type is '{}', expected 'service_account'",
            other
        ))),
        None => warnings.push(shape("missing 'type' field")),
    }
    for field in ["client_email", "private_key"] {
        let present = json
            .get(field)
            .and_then(|v| v.as_str())
            .is_some_and(|v| !v.is_empty());
        if !present {
            warnings.push(shape(&format!("missing '{}' field", field)));
        }
    }
    warnings
}
