use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Interpreter '{bin}' not found (Python {min_version}+ is required)")]
    InterpreterNotFound { bin: String, min_version: String },

    #[error("Interpreter '{bin}' reports Python {found}, but {min_version}+ is required")]
    InterpreterTooOld {
        bin: String,
        found: String,
        min_version: String,
    },

    #[error("Failed to create virtual environment at {}: {message}", .path.display())]
    VenvError { path: PathBuf, message: String },

    #[error("Package installation failed: {message}")]
    InstallError { message: String },

    #[error("Service account file not found: {}", .path.display())]
    CredentialsMissing { path: PathBuf },

    #[error("Service account file still contains placeholder values: {}", .path.display())]
    CredentialsPlaceholder { path: PathBuf },

    #[error("Failed to launch {}: {source}", .program.display())]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Env file error: {0}")]
    EnvFileError(#[from] dotenvy::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl LaunchError {
    /// Short hint printed after the error on stderr.
    pub fn recovery_suggestion(&self) -> String {
        match self {
            LaunchError::InterpreterNotFound { min_version, .. }
            | LaunchError::InterpreterTooOld { min_version, .. } => format!(
                "Install Python {}+ or point PYTHON_BIN at a suitable interpreter",
                min_version
            ),
            LaunchError::VenvError { path, .. } => format!(
                "Remove {} and retry, or set VENV_DIR to a writable location",
                path.display()
            ),
            LaunchError::InstallError { .. } => {
                "Check network access; behind a proxy set HTTPS_PROXY, or set PIP_INDEX_URL to a reachable index".to_string()
            }
            LaunchError::CredentialsMissing { path } => format!(
                "Create a key with: gcloud iam service-accounts keys create {} --iam-account=<service-account-email>",
                path.display()
            ),
            LaunchError::CredentialsPlaceholder { path } => format!(
                "Replace {} with the JSON key downloaded from Google Cloud",
                path.display()
            ),
            LaunchError::LaunchFailed { .. } => {
                "Delete the virtual environment directory to force a reinstall".to_string()
            }
            LaunchError::IoError(_) => "Check file permissions and paths".to_string(),
            LaunchError::EnvFileError(_) => {
                "Fix the syntax of the env file (KEY=value per line)".to_string()
            }
            LaunchError::ConfigError { .. } | LaunchError::InvalidConfigValueError { .. } => {
                "Check launcher.toml and the launcher environment variables".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LaunchError::IoError(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }

    /// Every precondition failure exits with 1; the launched program owns all other codes.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
