//! Synchronous process execution and shell-style command pipelines.
//!
//! `pipexec` runs external commands and chains them with pipes the way a shell
//! does, returning a single structured [`ProcessResult`] instead of raising on
//! failure. The pipeline engine guarantees that a spawn or wait error partway
//! through never leaks a running process or a pipe descriptor.
//!
//! # Usage
//!
//! ```no_run
//! use pipexec::{pipe, run, ExecConfig};
//! use std::time::Duration;
//!
//! // Run a single command through the shell.
//! let result = run("printf foo", &ExecConfig::new()).unwrap();
//! assert_eq!(result.stdout, "foo");
//!
//! // Run with a timeout, argv-style.
//! let config = ExecConfig::new()
//!     .shell(false)
//!     .timeout(Duration::from_secs(5));
//! let result = run("ls -la", &config).unwrap();
//!
//! // Chain commands like `printf ... | sort | head -n 1`.
//! let result = pipe(["printf 'b\\na\\n'", "sort", "head -n 1"], true).unwrap();
//! assert_eq!(result.stdout, "a\n");
//! ```
//!
//! # Failure model
//!
//! Command failures are data, not exceptions: a missing binary, a timeout or a
//! non-zero exit all arrive as a `ProcessResult` whose
//! [`success()`](ProcessResult::success) is false. Engine-internal failures use
//! the reserved exit code [`ENGINE_FAILURE_CODE`] (`-1`); a child can
//! legitimately exit with a status mapping to the same value, and the engine
//! does not disambiguate the two. Only misuse of the API itself, such as an
//! empty pipeline, returns an [`Error`].

pub mod command;
pub mod config;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod ps;
pub mod result;
pub mod runner;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use command::CommandSpec;
pub use config::ExecConfig;
pub use error::{Error, Result};
pub use lookup::{which, which_in};
pub use pipeline::pipe;
pub use ps::{kill, ps, ProcessInfo, ProcessLister, PsLister};
pub use result::{ProcessResult, ENGINE_FAILURE_CODE};
pub use runner::{capture, run};

#[cfg(feature = "ps-native")]
pub use ps::NativeLister;

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
