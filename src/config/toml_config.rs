use crate::utils::error::{LaunchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `launcher.toml`. Every key may be omitted; missing keys keep
/// their built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherFile {
    pub python: Option<PythonSection>,
    pub package: Option<PackageSection>,
    pub paths: Option<PathsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PythonSection {
    pub bin: Option<String>,
    pub min_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    /// What gets handed to `pip install`, relative to the root.
    pub path: Option<String>,
    pub manifest: Option<String>,
    pub entry_point: Option<String>,
    pub install_marker: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub venv_dir: Option<String>,
    pub config_dir: Option<String>,
    pub env_file: Option<String>,
    /// File name looked up inside the config directory.
    pub credentials_file: Option<String>,
}

impl LauncherFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LaunchError::IoError)?;
        Self::from_toml_str(&content).map_err(|e| LaunchError::ConfigError {
            message: format!("{}: {}", path.as_ref().display(), e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LaunchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_file() {
        let file = LauncherFile::from_toml_str(
            r#"
[python]
bin = "python3.12"

[paths]
venv_dir = "/opt/seo/.venv"
"#,
        )
        .unwrap();

        let python = file.python.unwrap();
        assert_eq!(python.bin.as_deref(), Some("python3.12"));
        assert!(python.min_version.is_none());
        assert!(file.package.is_none());
        assert_eq!(
            file.paths.unwrap().venv_dir.as_deref(),
            Some("/opt/seo/.venv")
        );
    }

    #[test]
    fn test_empty_file_is_valid() {
        let file = LauncherFile::from_toml_str("").unwrap();
        assert!(file.python.is_none());
        assert!(file.paths.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = LauncherFile::from_toml_str(
            r#"
[python]
interpreter = "python3"
"#,
        );
        assert!(matches!(result, Err(LaunchError::ConfigError { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[package]\nentry_point = \"seo-mcp\"\n")
            .unwrap();

        let file = LauncherFile::from_file(temp_file.path()).unwrap();
        assert_eq!(
            file.package.unwrap().entry_point.as_deref(),
            Some("seo-mcp")
        );
    }
}
