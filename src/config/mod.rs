//! Launcher settings.
//!
//! Resolution order, lowest to highest precedence: built-in defaults, the
//! optional `launcher.toml`, then environment variables. Relative paths are
//! joined to the launcher root.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `LAUNCHER_ROOT` | Project root | nearest ancestor of the executable holding the manifest, else cwd |
//! | `LAUNCHER_CONFIG` | Path to `launcher.toml` | `<root>/launcher.toml` |
//! | `PYTHON_BIN` | Interpreter used to create the venv | `python3` |
//! | `VENV_DIR` | Virtual environment directory | `<root>/.venv` |
//! | `CONFIG_DIR` | Configuration directory | `<root>/config` |
//! | `ENV_FILE` | Env file loaded before launch | `<CONFIG_DIR>/.env` |

pub mod cli;
pub mod env_file;
pub mod toml_config;

use crate::domain::model::Environment;
use crate::utils::error::{LaunchError, Result};
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::LauncherFile;

pub const LAUNCHER_ROOT_ENV: &str = "LAUNCHER_ROOT";
pub const LAUNCHER_CONFIG_ENV: &str = "LAUNCHER_CONFIG";
pub const LAUNCHER_VERBOSE_ENV: &str = "LAUNCHER_VERBOSE";
pub const LAUNCHER_DRY_RUN_ENV: &str = "LAUNCHER_DRY_RUN";
pub const PYTHON_BIN_ENV: &str = "PYTHON_BIN";
pub const VENV_DIR_ENV: &str = "VENV_DIR";
pub const CONFIG_DIR_ENV: &str = "CONFIG_DIR";
pub const ENV_FILE_ENV: &str = "ENV_FILE";

pub const DEFAULT_PYTHON_BIN: &str = "python3";
pub const DEFAULT_MIN_PYTHON: &str = "3.10";
pub const DEFAULT_MANIFEST: &str = "pyproject.toml";
pub const DEFAULT_ENTRY_POINT: &str = "seo-analytics-mcp";
pub const DEFAULT_INSTALL_MARKER: &str = ".install-stamp";
pub const DEFAULT_CREDENTIALS_FILE: &str = "service-account.json";
pub const LAUNCHER_FILE_NAME: &str = "launcher.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    pub root: PathBuf,
    pub python_bin: String,
    pub min_python: String,
    pub venv_dir: PathBuf,
    pub config_dir: PathBuf,
    pub env_file: PathBuf,
    pub manifest: PathBuf,
    pub package_path: PathBuf,
    pub entry_point: String,
    pub install_marker: String,
    pub credentials_file: String,
}

impl LauncherSettings {
    /// Resolves settings for `root` from `launcher.toml` and `env`.
    pub fn resolve(root: PathBuf, env: &Environment) -> Result<Self> {
        let file = Self::load_file(&root, env)?;
        let python = file.python.unwrap_or_default();
        let package = file.package.unwrap_or_default();
        let paths = file.paths.unwrap_or_default();

        let python_bin = env
            .get_non_empty(PYTHON_BIN_ENV)
            .map(str::to_string)
            .or(python.bin)
            .unwrap_or_else(|| DEFAULT_PYTHON_BIN.to_string());

        let venv_dir = env
            .get_non_empty(VENV_DIR_ENV)
            .map(str::to_string)
            .or(paths.venv_dir)
            .map(|p| join_root(&root, &p))
            .unwrap_or_else(|| root.join(".venv"));

        let config_dir = env
            .get_non_empty(CONFIG_DIR_ENV)
            .map(str::to_string)
            .or(paths.config_dir)
            .map(|p| join_root(&root, &p))
            .unwrap_or_else(|| root.join("config"));

        let env_file = env
            .get_non_empty(ENV_FILE_ENV)
            .map(str::to_string)
            .or(paths.env_file)
            .map(|p| join_root(&root, &p))
            .unwrap_or_else(|| config_dir.join(".env"));

        let settings = Self {
            python_bin,
            min_python: python
                .min_version
                .unwrap_or_else(|| DEFAULT_MIN_PYTHON.to_string()),
            venv_dir,
            config_dir,
            env_file,
            manifest: join_root(
                &root,
                package.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST),
            ),
            package_path: join_root(&root, package.path.as_deref().unwrap_or(".")),
            entry_point: package
                .entry_point
                .unwrap_or_else(|| DEFAULT_ENTRY_POINT.to_string()),
            install_marker: package
                .install_marker
                .unwrap_or_else(|| DEFAULT_INSTALL_MARKER.to_string()),
            credentials_file: paths
                .credentials_file
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
            root,
        };

        settings.validate()?;
        Ok(settings)
    }

    fn load_file(root: &Path, env: &Environment) -> Result<LauncherFile> {
        match env.get_non_empty(LAUNCHER_CONFIG_ENV) {
            Some(explicit) => {
                let path = join_root(root, explicit);
                if !path.is_file() {
                    return Err(LaunchError::ConfigError {
                        message: format!(
                            "{} points to {}, which does not exist",
                            LAUNCHER_CONFIG_ENV,
                            path.display()
                        ),
                    });
                }
                tracing::debug!("Loading launcher settings from {}", path.display());
                LauncherFile::from_file(path)
            }
            None => {
                let path = root.join(LAUNCHER_FILE_NAME);
                if path.is_file() {
                    tracing::debug!("Loading launcher settings from {}", path.display());
                    LauncherFile::from_file(path)
                } else {
                    Ok(LauncherFile::default())
                }
            }
        }
    }

    /// Picks the project root: `LAUNCHER_ROOT`, then the nearest ancestor of
    /// the executable that holds the package manifest, then the working directory.
    pub fn discover_root(env: &Environment) -> Result<PathBuf> {
        if let Some(root) = env.get_non_empty(LAUNCHER_ROOT_ENV) {
            let root = PathBuf::from(root);
            if root.is_absolute() {
                return Ok(root);
            }
            return Ok(std::env::current_dir()?.join(root));
        }

        if let Ok(exe) = std::env::current_exe() {
            if let Some(found) = exe
                .ancestors()
                .skip(1)
                .find(|dir| dir.join(DEFAULT_MANIFEST).is_file())
            {
                return Ok(found.to_path_buf());
            }
        }

        Ok(std::env::current_dir()?)
    }

    pub fn venv_bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.venv_dir.join("Scripts")
        } else {
            self.venv_dir.join("bin")
        }
    }

    pub fn venv_python(&self) -> PathBuf {
        self.venv_bin_dir().join(exe_name("python"))
    }

    pub fn entry_point_path(&self) -> PathBuf {
        self.venv_bin_dir().join(exe_name(&self.entry_point))
    }

    pub fn install_marker_path(&self) -> PathBuf {
        self.venv_dir.join(&self.install_marker)
    }

    pub fn default_credentials_path(&self) -> PathBuf {
        self.config_dir.join(&self.credentials_file)
    }

    pub fn min_python_version(&self) -> Result<(u32, u32)> {
        validation::parse_min_version("python.min_version", &self.min_python)
    }
}

impl Validate for LauncherSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("python.bin", &self.python_bin)?;
        self.min_python_version()?;
        validation::validate_path("paths.venv_dir", &self.venv_dir)?;
        validation::validate_path("paths.config_dir", &self.config_dir)?;
        validation::validate_path("paths.env_file", &self.env_file)?;
        validation::validate_path("package.manifest", &self.manifest)?;
        validation::validate_file_name("package.entry_point", &self.entry_point)?;
        validation::validate_file_name("package.install_marker", &self.install_marker)?;
        validation::validate_file_name("paths.credentials_file", &self.credentials_file)?;
        Ok(())
    }
}

/// Joins `path` to `root` unless it is already absolute.
pub fn join_root(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn exe_name(stem: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", stem)
    } else {
        stem.to_string()
    }
}

/// Shell-style truthiness used for the launcher's own switches.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let root = PathBuf::from("/srv/seo");
        let settings = LauncherSettings::resolve(root.clone(), &Environment::new()).unwrap();

        assert_eq!(settings.python_bin, "python3");
        assert_eq!(settings.venv_dir, root.join(".venv"));
        assert_eq!(settings.config_dir, root.join("config"));
        assert_eq!(settings.env_file, root.join("config").join(".env"));
        assert_eq!(settings.manifest, root.join("pyproject.toml"));
        assert_eq!(
            settings.default_credentials_path(),
            root.join("config").join("service-account.json")
        );
        assert_eq!(settings.min_python_version().unwrap(), (3, 10));
    }

    #[test]
    fn test_env_overrides_and_relative_paths() {
        let root = PathBuf::from("/srv/seo");
        let env: Environment = [
            (PYTHON_BIN_ENV, "/usr/bin/python3.12"),
            (VENV_DIR_ENV, "/opt/venv"),
            (CONFIG_DIR_ENV, "secrets"),
        ]
        .into_iter()
        .collect();

        let settings = LauncherSettings::resolve(root.clone(), &env).unwrap();
        assert_eq!(settings.python_bin, "/usr/bin/python3.12");
        assert_eq!(settings.venv_dir, PathBuf::from("/opt/venv"));
        assert_eq!(settings.config_dir, root.join("secrets"));
        assert_eq!(settings.env_file, root.join("secrets").join(".env"));
    }

    #[test]
    fn test_env_file_override() {
        let root = PathBuf::from("/srv/seo");
        let env: Environment = [(ENV_FILE_ENV, "prod.env")].into_iter().collect();
        let settings = LauncherSettings::resolve(root.clone(), &env).unwrap();
        assert_eq!(settings.env_file, root.join("prod.env"));
    }

    #[test]
    fn test_launcher_file_layering() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(LAUNCHER_FILE_NAME),
            r#"
[python]
bin = "python3.11"
min_version = "3.11"

[package]
entry_point = "seo-mcp"
"#,
        )
        .unwrap();

        let env: Environment = [(PYTHON_BIN_ENV, "python3.13")].into_iter().collect();
        let settings = LauncherSettings::resolve(temp_dir.path().to_path_buf(), &env).unwrap();

        // env beats file, file beats defaults
        assert_eq!(settings.python_bin, "python3.13");
        assert_eq!(settings.min_python_version().unwrap(), (3, 11));
        assert_eq!(settings.entry_point, "seo-mcp");
    }

    #[test]
    fn test_missing_explicit_launcher_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let env: Environment = [(LAUNCHER_CONFIG_ENV, "nope.toml")].into_iter().collect();
        let result = LauncherSettings::resolve(temp_dir.path().to_path_buf(), &env);
        assert!(matches!(result, Err(LaunchError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_entry_point_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(LAUNCHER_FILE_NAME),
            "[package]\nentry_point = \"bin/seo\"\n",
        )
        .unwrap();

        let result = LauncherSettings::resolve(temp_dir.path().to_path_buf(), &Environment::new());
        assert!(matches!(
            result,
            Err(LaunchError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_discover_root_prefers_env() {
        let env: Environment = [(LAUNCHER_ROOT_ENV, "/srv/seo")].into_iter().collect();
        assert_eq!(
            LauncherSettings::discover_root(&env).unwrap(),
            PathBuf::from("/srv/seo")
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some(" YES ")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(None));
    }
}
