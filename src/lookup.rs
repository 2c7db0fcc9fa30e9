//! Executable lookup on the search path.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Find the full path of a program, like the `which` command.
///
/// Returns `None` when the program is not on the caller's `PATH`.
///
/// # Examples
///
/// ```no_run
/// let sh = pipexec::which("sh").expect("sh should be on PATH");
/// assert!(sh.is_absolute());
/// ```
pub fn which(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Find a program on an explicitly supplied search path.
///
/// The search path is an injected value rather than the ambient process
/// environment, so tests and embedders can control resolution. `None` falls
/// back to the caller's `PATH`.
pub fn which_in<P: AsRef<OsStr>>(program: &str, path: Option<P>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    which::which_in(program, path, cwd).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn finds_sh_on_default_path() {
        let path = which("sh").expect("sh should exist");
        assert!(path.is_absolute());
    }

    #[test]
    fn missing_program_is_none() {
        assert!(which("pipexec-definitely-not-a-real-binary").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn injected_path_overrides_environment() {
        // An empty search path resolves nothing, regardless of the ambient PATH.
        assert!(which_in("sh", Some("")).is_none());
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(which_in("sh", Some(dir.path())).is_none());
    }
}
