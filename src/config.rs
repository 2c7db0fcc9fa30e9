//! Execution configuration for [`run`](crate::run) and friends.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for executing a single command.
///
/// All setters are chainable and return `self` for fluent composition.
///
/// # Examples
///
/// ```
/// use pipexec::ExecConfig;
/// use std::time::Duration;
///
/// let config = ExecConfig::new()
///     .shell(false)
///     .working_dir("/tmp")
///     .timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Interpret the command as a shell line (`sh -c`) rather than an argv
    /// vector. Defaults to `true`.
    pub shell: bool,

    /// Working directory for the child. `None` inherits the caller's.
    pub working_dir: Option<PathBuf>,

    /// Environment for the child. `None` inherits the caller's environment;
    /// `Some` replaces it entirely rather than merging.
    pub env: Option<HashMap<String, String>>,

    /// Maximum wall-clock duration before the child is forcibly terminated.
    pub timeout: Option<Duration>,

    /// Capture stdout/stderr into the result. When `false` the child inherits
    /// the caller's stdio and the result text fields are empty. Defaults to
    /// `true`.
    pub capture_output: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            shell: true,
            working_dir: None,
            env: None,
            timeout: None,
            capture_output: true,
        }
    }
}

impl ExecConfig {
    /// Create a configuration with defaults (shell mode, capture on).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the command string is interpreted by the shell.
    pub fn shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    /// Set the working directory for the spawned process.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the child's environment with the given map.
    ///
    /// Note this is a full replacement: variables not present in the map,
    /// including `PATH`, are absent in the child.
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Add a single environment variable, switching to full-replacement mode
    /// if no environment was set yet.
    pub fn env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the maximum wall-clock duration for the command.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set whether stdout/stderr are captured into the result.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_run_semantics() {
        let config = ExecConfig::default();
        assert!(config.shell);
        assert!(config.capture_output);
        assert!(config.working_dir.is_none());
        assert!(config.env.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn env_var_accumulates() {
        let config = ExecConfig::new().env_var("A", "1").env_var("B", "2");
        let env = config.env.unwrap();
        assert_eq!(env.get("A").map(String::as_str), Some("1"));
        assert_eq!(env.get("B").map(String::as_str), Some("2"));
    }
}
