//! Structured outcome of a command or pipeline execution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exit code reported when the engine itself fails: spawn error, timeout, or a
/// pipeline aborted by cleanup.
///
/// A child process can legitimately exit with a status that maps to the same
/// value, and the engine does not disambiguate the two cases. Callers that need
/// certainty should check `stderr` for an engine message.
pub const ENGINE_FAILURE_CODE: i32 = -1;

/// Result of executing a command or pipeline.
///
/// This is the single externally visible outcome type: non-zero exits, spawn
/// failures and timeouts all arrive here rather than as errors.
///
/// # Examples
///
/// ```no_run
/// use pipexec::{run, ExecConfig};
///
/// let result = run("printf foo", &ExecConfig::new()).unwrap();
/// assert!(result.success());
/// assert_eq!(result.stdout, "foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error. For a pipeline this is the terminal stage's
    /// stderr, or the engine's failure description.
    pub stderr: String,

    /// Exit code of the process, or of the terminal stage for a pipeline.
    /// [`ENGINE_FAILURE_CODE`] for engine-internal failures.
    pub exit_code: i32,

    /// Human-readable reconstruction of what ran. Pipeline stages are joined
    /// with `" | "`.
    pub command: String,
}

impl ProcessResult {
    /// Whether the process completed successfully.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Build a result describing an engine-level failure.
    pub(crate) fn engine_failure(command: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.to_string(),
            exit_code: ENGINE_FAILURE_CODE,
            command: command.into(),
        }
    }
}

impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_tracks_exit_code() {
        let ok = ProcessResult {
            stdout: "out".into(),
            stderr: String::new(),
            exit_code: 0,
            command: "true".into(),
        };
        assert!(ok.success());

        let failed = ProcessResult {
            exit_code: 2,
            ..ok.clone()
        };
        assert!(!failed.success());
    }

    #[test]
    fn engine_failure_uses_sentinel() {
        let result = ProcessResult::engine_failure("a | b", "spawn failed");
        assert_eq!(result.exit_code, ENGINE_FAILURE_CODE);
        assert_eq!(result.stderr, "spawn failed");
        assert_eq!(result.command, "a | b");
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn display_is_stdout() {
        let result = ProcessResult {
            stdout: "hello\n".into(),
            stderr: "ignored".into(),
            exit_code: 0,
            command: "echo hello".into(),
        };
        assert_eq!(result.to_string(), "hello\n");
    }
}
