use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// A snapshot of environment variables. Non-UTF-8 entries are carried through
/// untouched but are invisible to the string accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_process() -> Self {
        std::env::vars_os().collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(OsStr::new(key)).and_then(|v| v.to_str())
    }

    /// Like `get`, but treats an empty value the same as an unset one.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(OsStr::new(key))
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<OsString> {
        self.vars.remove(OsStr::new(key))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A subprocess call: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// `None` when the child was killed by a signal.
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: RunStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Non-fatal findings collected during bootstrap. Each one is logged as a
/// warning and execution continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchWarning {
    PlaceholderValue { key: String, env_file: PathBuf },
    SiteUrlUnusable { raw: String },
    SiteUrlNotADomain { site_url: String },
    CredentialsFallback { requested: PathBuf, fallback: PathBuf },
    CredentialsShape { path: PathBuf, detail: String },
    SettingValue { key: String, value: String, reason: String },
}

impl fmt::Display for LaunchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchWarning::PlaceholderValue { key, env_file } => write!(
                f,
                "{} still holds a placeholder value; edit {}",
                key,
                env_file.display()
            ),
            LaunchWarning::SiteUrlUnusable { raw } => write!(
                f,
                "Site URL '{}' has no domain part; leaving it unchanged",
                raw
            ),
            LaunchWarning::SiteUrlNotADomain { site_url } => write!(
                f,
                "Site URL '{}' does not look like a valid domain",
                site_url
            ),
            LaunchWarning::CredentialsFallback {
                requested,
                fallback,
            } => write!(
                f,
                "Service account file {} not found; falling back to {}",
                requested.display(),
                fallback.display()
            ),
            LaunchWarning::CredentialsShape { path, detail } => {
                write!(f, "{}: {}", path.display(), detail)
            }
            LaunchWarning::SettingValue { key, value, reason } => {
                write!(f, "{}='{}': {}", key, value, reason)
            }
        }
    }
}

/// Everything needed for the final exec, assembled once and never mutated.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    program: PathBuf,
    args: Vec<OsString>,
    env: Environment,
    credentials_path: PathBuf,
}

impl LaunchPlan {
    pub fn new(
        program: PathBuf,
        args: Vec<OsString>,
        env: Environment,
        credentials_path: PathBuf,
    ) -> Self {
        Self {
            program,
            args,
            env,
            credentials_path,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }
}
