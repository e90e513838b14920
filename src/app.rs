use crate::config::cli::Args;
use crate::config::{is_truthy, LauncherSettings, LAUNCHER_DRY_RUN_ENV};
use crate::core::bootstrap::Bootstrapper;
use crate::domain::model::{Environment, LaunchPlan};
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{LaunchError, Result};

/// Resolves settings, bootstraps, then either prints the dry-run summary or
/// hands the plan to `exec`. `exec` only returns on failure.
pub fn run<R, X>(args: Args, base_env: Environment, runner: &R, exec: X) -> Result<()>
where
    R: ProcessRunner,
    X: FnOnce(&LaunchPlan) -> LaunchError,
{
    let root = LauncherSettings::discover_root(&base_env)?;
    let settings = LauncherSettings::resolve(root, &base_env)?;
    tracing::debug!("Launcher settings: {:?}", settings);

    let dry_run = is_truthy(base_env.get(LAUNCHER_DRY_RUN_ENV));
    let prepared = Bootstrapper::new(&settings, runner).run(base_env, args.forwarded)?;

    if dry_run {
        for line in prepared.summary_lines(&settings) {
            eprintln!("{}", line);
        }
        return Ok(());
    }

    Err(exec(&prepared.plan))
}

/// Lines printed on stderr before exiting with `error.exit_code()`.
pub fn failure_lines(error: &LaunchError) -> Vec<String> {
    vec![
        format!("❌ {}", error.user_friendly_message()),
        format!("💡 {}", error.recovery_suggestion()),
    ]
}
