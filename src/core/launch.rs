use crate::domain::model::LaunchPlan;
use crate::utils::error::LaunchError;
use std::process::Command;

/// The command for `plan`, with the environment replaced wholesale.
pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut command = Command::new(plan.program());
    command.args(plan.args()).env_clear().envs(plan.env().iter());
    command
}

/// Replaces the current process with the planned program. Only returns if
/// the exec itself failed.
#[cfg(unix)]
pub fn exec(plan: &LaunchPlan) -> LaunchError {
    use std::os::unix::process::CommandExt;

    tracing::debug!("exec {}", plan.program().display());
    let source = build_command(plan).exec();
    LaunchError::LaunchFailed {
        program: plan.program().to_path_buf(),
        source,
    }
}

/// Without exec, run the program as a child and mirror its exit code.
#[cfg(not(unix))]
pub fn exec(plan: &LaunchPlan) -> LaunchError {
    tracing::debug!("spawn {}", plan.program().display());
    match build_command(plan).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => LaunchError::LaunchFailed {
            program: plan.program().to_path_buf(),
            source,
        },
    }
}
