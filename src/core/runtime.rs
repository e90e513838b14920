use crate::domain::model::Invocation;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{LaunchError, Result};
use regex::Regex;
use std::fmt;
use std::io::ErrorKind;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Python\s+(\d+)\.(\d+)(?:\.(\d+))?").expect("valid version pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl PythonVersion {
    /// Extracts the version from `python --version` output.
    pub fn parse(output: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(output)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        })
    }

    pub fn satisfies(&self, min: (u32, u32)) -> bool {
        (self.major, self.minor) >= min
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Confirms `bin` runs and is at least `min`.
pub fn check_interpreter<R: ProcessRunner>(
    runner: &R,
    bin: &str,
    min: (u32, u32),
) -> Result<PythonVersion> {
    let min_version = format!("{}.{}", min.0, min.1);
    let not_found = || LaunchError::InterpreterNotFound {
        bin: bin.to_string(),
        min_version: min_version.clone(),
    };

    let output = match runner.capture(&Invocation::new(bin).arg("--version")) {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(LaunchError::IoError(e)),
    };

    if !output.status.success() {
        tracing::debug!("{} --version failed with {}", bin, output.status);
        return Err(not_found());
    }

    // Old interpreters print the version on stderr.
    let combined = format!("{}\n{}", output.stdout, output.stderr);
    let version = PythonVersion::parse(&combined).ok_or_else(|| LaunchError::InterpreterTooOld {
        bin: bin.to_string(),
        found: combined.trim().to_string(),
        min_version: min_version.clone(),
    })?;

    if !version.satisfies(min) {
        return Err(LaunchError::InterpreterTooOld {
            bin: bin.to_string(),
            found: version.to_string(),
            min_version,
        });
    }

    tracing::debug!("Using {} (Python {})", bin, version);
    Ok(version)
}
