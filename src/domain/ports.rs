use crate::domain::model::{CapturedOutput, Invocation, RunStatus};

/// Blocking subprocess execution used during bootstrap.
pub trait ProcessRunner {
    /// Runs to completion with the child's stdout forwarded to our stderr.
    fn run_streamed(&self, invocation: &Invocation) -> std::io::Result<RunStatus>;

    /// Runs to completion and collects both output streams.
    fn capture(&self, invocation: &Invocation) -> std::io::Result<CapturedOutput>;
}
