use crate::config::env_file::read_env_file;
use crate::config::LauncherSettings;
use crate::core::credentials::{resolve_credentials_path, validate_credentials_file};
use crate::core::environment::{
    apply_env_file, clear_stale_credentials, default_explicit_site_flag, normalize_site_setting,
    placeholder_warnings, PROPERTY_ID_KEY, REQUIRE_EXPLICIT_SITE_KEY, SERVICE_ACCOUNT_FILE_KEY,
    SITE_URL_KEY, STALE_KEYS,
};
use crate::core::lint::lint_server_settings;
use crate::core::runtime::check_interpreter;
use crate::core::venv::VenvManager;
use crate::domain::model::{Environment, LaunchPlan, LaunchWarning};
use crate::domain::ports::ProcessRunner;
use crate::utils::error::Result;
use std::cell::RefCell;
use std::ffi::OsString;

#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    pub plan: LaunchPlan,
    pub warnings: Vec<LaunchWarning>,
    pub env_file_loaded: bool,
}

impl PreparedLaunch {
    /// Human-readable description of what would be launched.
    pub fn summary_lines(&self, settings: &LauncherSettings) -> Vec<String> {
        let plan = &self.plan;
        let env_file = if self.env_file_loaded {
            settings.env_file.display().to_string()
        } else {
            format!("{} (not found)", settings.env_file.display())
        };
        let args: Vec<_> = plan.args().iter().map(|a| a.to_string_lossy()).collect();

        let mut lines = vec![
            "📋 Launch Summary (dry run):".to_string(),
            format!("  Root: {}", settings.root.display()),
            format!("  Interpreter: {}", settings.python_bin),
            format!("  Virtualenv: {}", settings.venv_dir.display()),
            format!("  Env file: {}", env_file),
            format!("  Program: {}", plan.program().display()),
            format!("  Arguments: {}", args.join(" ")),
            format!("  Credentials: {}", plan.credentials_path().display()),
        ];
        for key in [SITE_URL_KEY, PROPERTY_ID_KEY, REQUIRE_EXPLICIT_SITE_KEY] {
            lines.push(format!(
                "  {}: {}",
                key,
                plan.env().get(key).unwrap_or("(unset)")
            ));
        }
        lines.push(format!("  Warnings: {}", self.warnings.len()));
        lines
    }
}

/// Drives every step up to, but not including, the exec.
pub struct Bootstrapper<'a, R: ProcessRunner> {
    settings: &'a LauncherSettings,
    runner: &'a R,
    warnings: RefCell<Vec<LaunchWarning>>,
}

impl<'a, R: ProcessRunner> Bootstrapper<'a, R> {
    pub fn new(settings: &'a LauncherSettings, runner: &'a R) -> Self {
        Self {
            settings,
            runner,
            warnings: RefCell::new(Vec::new()),
        }
    }

    pub fn run(&self, base_env: Environment, args: Vec<OsString>) -> Result<PreparedLaunch> {
        self.prepare_runtime()?;
        let prepared = self.prepare_launch(base_env, args)?;

        eprintln!(
            "Using service account file: {}",
            prepared.plan.credentials_path().display()
        );
        Ok(prepared)
    }

    /// Every warning reported so far, including those logged before a
    /// later step failed.
    pub fn warnings(&self) -> Vec<LaunchWarning> {
        self.warnings.borrow().clone()
    }

    /// Logs immediately so nothing is lost if a later step aborts.
    fn report(&self, warnings: impl IntoIterator<Item = LaunchWarning>) {
        for warning in warnings {
            tracing::warn!("⚠️  {}", warning);
            self.warnings.borrow_mut().push(warning);
        }
    }

    /// Interpreter check, venv creation and package install.
    pub fn prepare_runtime(&self) -> Result<()> {
        let min = self.settings.min_python_version()?;
        check_interpreter(self.runner, &self.settings.python_bin, min)?;

        let venv = VenvManager::new(self.settings, self.runner);
        venv.ensure_venv()?;
        venv.ensure_installed()?;
        Ok(())
    }

    /// Builds the child environment and validates credentials. Touches
    /// nothing but the files it reads.
    pub fn prepare_launch(
        &self,
        base_env: Environment,
        args: Vec<OsString>,
    ) -> Result<PreparedLaunch> {
        let mut env = base_env;

        for key in clear_stale_credentials(&mut env) {
            tracing::debug!("Ignoring inherited {}", key);
        }

        let env_file = &self.settings.env_file;
        let env_file_loaded = match read_env_file(env_file, &STALE_KEYS)? {
            Some(pairs) => {
                tracing::info!("🔧 Loaded settings from {}", env_file.display());
                apply_env_file(&mut env, pairs);
                true
            }
            None => false,
        };

        self.report(placeholder_warnings(&env, env_file));
        let mut site_warnings = Vec::new();
        if let Some(site_url) = normalize_site_setting(&mut env, &mut site_warnings) {
            tracing::info!("🌐 Search Console property: {}", site_url);
        }
        self.report(site_warnings);
        default_explicit_site_flag(&mut env);
        self.report(lint_server_settings(&env));

        let resolved = resolve_credentials_path(
            env.get_non_empty(SERVICE_ACCOUNT_FILE_KEY),
            &self.settings.default_credentials_path(),
            &self.settings.root,
        );
        self.report(resolved.warning());
        env.set(SERVICE_ACCOUNT_FILE_KEY, &resolved.path);

        self.report(validate_credentials_file(&resolved.path)?);

        Ok(PreparedLaunch {
            plan: LaunchPlan::new(self.settings.entry_point_path(), args, env, resolved.path),
            warnings: self.warnings(),
            env_file_loaded,
        })
    }
}
