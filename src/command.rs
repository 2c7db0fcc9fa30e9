//! Command representation and resolution.
//!
//! A raw command string is resolved exactly once, at the API boundary, into a
//! [`CommandSpec`]: either a string handed to `sh -c` or an argv vector split
//! with POSIX shell-word rules. Everything downstream works with the resolved
//! form, so quoting mistakes surface immediately instead of at spawn time.

use crate::error::{Error, Result};
use std::fmt;
use std::process::Command;

/// Shell used for `CommandSpec::Shell` on non-Windows targets.
#[cfg(not(windows))]
const SHELL: &str = "sh";
#[cfg(not(windows))]
const SHELL_ARG: &str = "-c";

#[cfg(windows)]
const SHELL: &str = "cmd";
#[cfg(windows)]
const SHELL_ARG: &str = "/C";

/// A single command, resolved for execution.
///
/// # Examples
///
/// ```
/// use pipexec::CommandSpec;
///
/// let shell = CommandSpec::resolve("ls -la | sort", true).unwrap();
/// assert!(matches!(shell, CommandSpec::Shell(_)));
///
/// let argv = CommandSpec::resolve("printf 'a b'", false).unwrap();
/// assert_eq!(argv, CommandSpec::Argv(vec!["printf".into(), "a b".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// Run the string through the system shell (`sh -c` on Unix).
    Shell(String),
    /// Run an already-tokenized argument vector directly.
    Argv(Vec<String>),
}

impl CommandSpec {
    /// Resolve a raw command string according to the shell flag.
    ///
    /// With `shell == false` the string is split using POSIX shell-word rules
    /// (quoting and escaping honored). A string that cannot be split, such as
    /// one with an unterminated quote, is a usage error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty command or a string
    /// that fails word splitting.
    pub fn resolve(raw: &str, shell: bool) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::invalid_argument("command must not be empty"));
        }
        if shell {
            return Ok(Self::Shell(raw.to_string()));
        }
        let argv = shlex::split(raw).ok_or_else(|| {
            Error::invalid_argument(format!("cannot tokenize command: {raw:?}"))
        })?;
        if argv.is_empty() {
            return Err(Error::invalid_argument("command must not be empty"));
        }
        Ok(Self::Argv(argv))
    }

    /// Build a command spec from an argument vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the vector is empty.
    pub fn from_argv<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(Error::invalid_argument("argv must not be empty"));
        }
        Ok(Self::Argv(argv))
    }

    /// Build the `std::process::Command` for this spec.
    ///
    /// Stdio, working directory and environment are left for the caller to
    /// configure before spawning.
    pub(crate) fn to_command(&self) -> Command {
        match self {
            Self::Shell(line) => {
                let mut cmd = Command::new(SHELL);
                cmd.arg(SHELL_ARG).arg(line);
                cmd
            }
            Self::Argv(argv) => {
                let mut cmd = Command::new(&argv[0]);
                cmd.args(&argv[1..]);
                cmd
            }
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell(line) => f.write_str(line),
            Self::Argv(argv) => f.write_str(&argv.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_mode_keeps_string_verbatim() {
        let spec = CommandSpec::resolve("grep -c foo | wc -l", true).unwrap();
        assert_eq!(spec, CommandSpec::Shell("grep -c foo | wc -l".into()));
        assert_eq!(spec.to_string(), "grep -c foo | wc -l");
    }

    #[test]
    fn argv_mode_honors_quoting() {
        let spec = CommandSpec::resolve(r#"printf "%s\n" 'two words'"#, false).unwrap();
        assert_eq!(
            spec,
            CommandSpec::Argv(vec!["printf".into(), "%s\\n".into(), "two words".into()])
        );
    }

    #[test]
    fn unterminated_quote_is_invalid() {
        let err = CommandSpec::resolve("echo 'oops", false).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn empty_command_is_invalid() {
        assert!(CommandSpec::resolve("", true).is_err());
        assert!(CommandSpec::resolve("   ", false).is_err());
        assert!(CommandSpec::from_argv(Vec::<String>::new()).is_err());
    }

    #[test]
    fn argv_display_joins_tokens() {
        let spec = CommandSpec::from_argv(["ls", "-la"]).unwrap();
        assert_eq!(spec.to_string(), "ls -la");
    }
}
