//! Single-command execution.
//!
//! Spawns one external command, optionally through the shell, with a
//! configurable working directory, environment and timeout, and returns a
//! [`ProcessResult`]. Runtime failures of the command (missing binary, timeout,
//! non-zero exit) are folded into the result; only API misuse is an `Err`.

use crate::command::CommandSpec;
use crate::config::ExecConfig;
use crate::error::Result;
use crate::result::ProcessResult;
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Execute a command and return its result.
///
/// The command string is interpreted by the shell when `config.shell` is set
/// (the default); otherwise it is tokenized with POSIX shell-word rules and
/// executed directly.
///
/// Spawn failures and timeouts produce a result with
/// [`ENGINE_FAILURE_CODE`](crate::ENGINE_FAILURE_CODE); a child may also exit
/// with a status that maps to the same value, which this engine does not
/// disambiguate.
///
/// # Examples
///
/// ```no_run
/// use pipexec::{run, ExecConfig};
///
/// let result = run("printf foo", &ExecConfig::new()).unwrap();
/// assert_eq!(result.stdout, "foo");
/// assert_eq!(result.exit_code, 0);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) for an
/// empty command or one that fails word splitting in argv mode.
pub fn run(command: &str, config: &ExecConfig) -> Result<ProcessResult> {
    let spec = CommandSpec::resolve(command, config.shell)?;
    Ok(run_spec(&spec, config))
}

/// Execute a command and return just its stdout.
///
/// # Errors
///
/// Same as [`run`].
pub fn capture(command: &str, config: &ExecConfig) -> Result<String> {
    Ok(run(command, config)?.stdout)
}

/// Execute an already-resolved [`CommandSpec`].
///
/// All runtime failures are folded into the returned result.
pub fn run_spec(spec: &CommandSpec, config: &ExecConfig) -> ProcessResult {
    let description = spec.to_string();
    let mut cmd = spec.to_command();
    apply_config(&mut cmd, config);

    debug!(command = %description, shell = config.shell, "spawning command");
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            debug!(command = %description, error = %err, "spawn failed");
            return ProcessResult::engine_failure(description, err);
        }
    };

    let stdout_reader = spawn_pipe_reader(child.stdout.take());
    let stderr_reader = spawn_pipe_reader(child.stderr.take());

    let outcome = match wait_for_exit(&mut child, config.timeout) {
        Ok(outcome) => outcome,
        Err(err) => {
            // Reap before bailing so no zombie outlives the call.
            let _ = child.kill();
            let _ = child.wait();
            join_pipe_reader(stdout_reader);
            join_pipe_reader(stderr_reader);
            return ProcessResult::engine_failure(description, err);
        }
    };

    // The child is gone either way, so the pipes are at EOF and the readers
    // finish without blocking.
    let stdout = join_pipe_reader(stdout_reader);
    let stderr = join_pipe_reader(stderr_reader);

    match outcome {
        WaitOutcome::Exited(exit_code) => ProcessResult {
            stdout,
            stderr,
            exit_code,
            command: description,
        },
        WaitOutcome::TimedOut(timeout) => ProcessResult {
            // Output captured before termination is preserved.
            stdout,
            stderr: format!("command timed out after {timeout:?}"),
            exit_code: crate::result::ENGINE_FAILURE_CODE,
            command: description,
        },
    }
}

fn apply_config(cmd: &mut Command, config: &ExecConfig) {
    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }
    if let Some(env) = &config.env {
        // Full replacement, not a merge.
        cmd.env_clear().envs(env);
    }
    if config.capture_output {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    }
}

enum WaitOutcome {
    Exited(i32),
    TimedOut(Duration),
}

/// Wait for the child, enforcing the timeout if one is configured.
///
/// On timeout the child is killed and reaped before returning, so the caller
/// never observes a still-running process.
fn wait_for_exit(child: &mut Child, timeout: Option<Duration>) -> io::Result<WaitOutcome> {
    let Some(timeout) = timeout else {
        let status = child.wait()?;
        return Ok(WaitOutcome::Exited(status.code().unwrap_or(-1)));
    };

    match child.wait_timeout(timeout)? {
        Some(status) => Ok(WaitOutcome::Exited(status.code().unwrap_or(-1))),
        None => {
            if let Err(err) = child.kill() {
                if err.kind() != io::ErrorKind::InvalidInput {
                    return Err(err);
                }
            }
            if let Err(err) = child.wait() {
                warn!("failed to reap timed-out command: {err}");
            }
            Ok(WaitOutcome::TimedOut(timeout))
        }
    }
}

/// Drain a child pipe on a background thread so a full OS buffer can never
/// stall the child while we block on its exit.
pub(crate) fn spawn_pipe_reader<R>(pipe: Option<R>) -> Option<thread::JoinHandle<String>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(err) = reader.read_to_end(&mut buf) {
                warn!("pipe read failed: {err}");
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

pub(crate) fn join_pipe_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.join().unwrap_or_else(|_| {
            warn!("pipe reader thread panicked");
            String::new()
        }),
        None => String::new(),
    }
}
