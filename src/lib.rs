pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::SystemRunner;
pub use config::{cli::Args, LauncherSettings};
pub use core::bootstrap::{Bootstrapper, PreparedLaunch};
pub use domain::model::{Environment, LaunchPlan, LaunchWarning};
pub use utils::error::{LaunchError, Result};
