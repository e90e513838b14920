use crate::domain::model::{CapturedOutput, Invocation, RunStatus};
use crate::domain::ports::ProcessRunner;
use std::process::{Command, Stdio};

/// Runs subprocesses with `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command
    }
}

impl ProcessRunner for SystemRunner {
    fn run_streamed(&self, invocation: &Invocation) -> std::io::Result<RunStatus> {
        tracing::debug!("Running: {}", invocation);
        let status = Self::command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .stderr(Stdio::inherit())
            .status()?;
        Ok(RunStatus {
            code: status.code(),
        })
    }

    fn capture(&self, invocation: &Invocation) -> std::io::Result<CapturedOutput> {
        tracing::debug!("Capturing: {}", invocation);
        let output = Self::command(invocation).stdin(Stdio::null()).output()?;
        Ok(CapturedOutput {
            status: RunStatus {
                code: output.status.code(),
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
