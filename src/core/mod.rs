pub mod bootstrap;
pub mod credentials;
pub mod environment;
pub mod launch;
pub mod lint;
pub mod runtime;
pub mod site;
pub mod venv;

pub use crate::domain::model::{Environment, LaunchPlan, LaunchWarning};
pub use crate::domain::ports::ProcessRunner;
pub use crate::utils::error::Result;

/// Marks a value the operator has not filled in yet, both in the env file
/// and in the template service account file.
pub const PLACEHOLDER_MARKER: &str = "REPLACE_ME";
