use crate::config::LauncherSettings;
use crate::domain::model::Invocation;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{LaunchError, Result};
use std::fs::{self, File};
use std::time::SystemTime;

/// Creates the virtual environment and keeps the package installed in it.
pub struct VenvManager<'a, R: ProcessRunner> {
    settings: &'a LauncherSettings,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> VenvManager<'a, R> {
    pub fn new(settings: &'a LauncherSettings, runner: &'a R) -> Self {
        Self { settings, runner }
    }

    /// Returns `true` if the environment had to be created.
    pub fn ensure_venv(&self) -> Result<bool> {
        let venv_dir = &self.settings.venv_dir;
        if venv_dir.is_dir() {
            tracing::debug!("Virtual environment present at {}", venv_dir.display());
            return Ok(false);
        }

        tracing::info!("📦 Creating virtual environment at {}", venv_dir.display());
        let invocation = Invocation::new(&self.settings.python_bin)
            .arg("-m")
            .arg("venv")
            .arg(venv_dir);

        let status = self
            .runner
            .run_streamed(&invocation)
            .map_err(|e| LaunchError::VenvError {
                path: venv_dir.clone(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(LaunchError::VenvError {
                path: venv_dir.clone(),
                message: format!("'{}' failed with {}", invocation, status),
            });
        }
        Ok(true)
    }

    /// An install is needed when the marker is absent or older than the manifest.
    pub fn needs_install(&self) -> Result<bool> {
        let marker = self.settings.install_marker_path();
        let marker_time = match fs::metadata(&marker) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        match fs::metadata(&self.settings.manifest) {
            Ok(meta) => Ok(meta.modified()? > marker_time),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns `true` if pip ran.
    pub fn ensure_installed(&self) -> Result<bool> {
        if !self.needs_install()? {
            tracing::debug!("Package install is up to date");
            return Ok(false);
        }

        tracing::info!(
            "📥 Installing {} into {}",
            self.settings.package_path.display(),
            self.settings.venv_dir.display()
        );
        let invocation = Invocation::new(self.settings.venv_python())
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg(&self.settings.package_path);

        let status = self
            .runner
            .run_streamed(&invocation)
            .map_err(|e| LaunchError::InstallError {
                message: format!("could not run '{}': {}", invocation, e),
            })?;
        if !status.success() {
            return Err(LaunchError::InstallError {
                message: format!("'{}' failed with {}", invocation, status),
            });
        }

        let marker = File::create(self.settings.install_marker_path())?;
        marker.set_modified(SystemTime::now())?;
        tracing::info!("✅ Package installed");
        Ok(true)
    }
}
