//! Shell-style command pipelines.
//!
//! Chains commands so each stage's stdout feeds the next stage's stdin, the
//! way `a | b | c` does, and returns a single [`ProcessResult`]. Spawned
//! children are owned by a [`StageSet`] whose drop handler terminates any
//! stage that has not been reaped, so a spawn or wait failure partway through
//! never leaks a running process or a pipe descriptor.

use crate::command::CommandSpec;
use crate::config::ExecConfig;
use crate::error::{Error, Result};
use crate::result::ProcessResult;
use crate::runner::{self, join_pipe_reader, spawn_pipe_reader};
use std::io::{self, Read};
use std::process::{Child, ChildStderr, ChildStdout, ExitStatus, Stdio};
use std::thread;
use tracing::{debug, warn};

/// Chain commands together with pipes, like the shell `|` operator.
///
/// The overall exit code is the terminal stage's exit code, matching
/// conventional pipeline semantics: the last stage wins even when an earlier
/// stage exits non-zero. There is no pipeline-level timeout; only
/// [`run`](crate::run) honors one.
///
/// A single-command list delegates entirely to the single-command runner, so
/// `pipe(["c"], shell)` behaves exactly like `run("c")`.
///
/// # Examples
///
/// ```no_run
/// use pipexec::pipe;
///
/// let result = pipe(["printf 'b\\na\\n'", "sort"], true).unwrap();
/// assert_eq!(result.stdout, "a\nb\n");
/// assert_eq!(result.command, "printf 'b\\na\\n' | sort");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty command list or a command
/// that fails word splitting in argv mode. Runtime failures (a stage that
/// cannot be spawned, wait errors) are folded into the result with
/// [`ENGINE_FAILURE_CODE`](crate::ENGINE_FAILURE_CODE) after every
/// already-spawned stage has been terminated.
pub fn pipe<I, S>(commands: I, shell: bool) -> Result<ProcessResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let specs: Vec<CommandSpec> = commands
        .into_iter()
        .map(|c| CommandSpec::resolve(c.as_ref(), shell))
        .collect::<Result<_>>()?;

    if specs.is_empty() {
        return Err(Error::invalid_argument("at least one command is required"));
    }
    if specs.len() == 1 {
        let config = ExecConfig::new().shell(shell);
        return Ok(runner::run_spec(&specs[0], &config));
    }

    let description = specs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ");

    let mut stages = StageSet::new();
    match execute(&specs, &mut stages, &description) {
        Ok(result) => Ok(result),
        Err(err) => {
            debug!(pipeline = %description, error = %err, "pipeline failed, terminating stages");
            // Dropping the set kills and reaps every unreaped stage.
            drop(stages);
            Ok(ProcessResult::engine_failure(description, err))
        }
    }
}

fn execute(
    specs: &[CommandSpec],
    stages: &mut StageSet,
    description: &str,
) -> io::Result<ProcessResult> {
    let stderr_drains = spawn_stages(specs, stages)?;
    collect(stages, stderr_drains, description)
}

/// Spawn each stage with its stdin wired to the previous stage's stdout.
///
/// The parent's read end of each intermediate pipe lives only inside the
/// `Command` being built and is dropped right after the spawn, so the upstream
/// EOF propagates as soon as that stage exits. Intermediate stderr pipes are
/// drained on background threads to keep a chatty stage from blocking on a
/// full buffer; their contents surface in the result only for the terminal
/// stage.
fn spawn_stages(specs: &[CommandSpec], stages: &mut StageSet) -> io::Result<Vec<StderrDrain>> {
    let mut drains = Vec::new();

    for (index, spec) in specs.iter().enumerate() {
        let mut cmd = spec.to_command();
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        if index > 0 {
            let upstream = stages.take_stdout(index - 1)?;
            cmd.stdin(Stdio::from(upstream));
            // The previous stage is now intermediate; start draining its
            // stderr so it can never stall on diagnostics.
            if let Some(handle) = spawn_pipe_reader(stages.take_stderr(index - 1)) {
                drains.push(StderrDrain {
                    stage: index - 1,
                    handle,
                });
            }
        }
        debug!(stage = index, command = %spec, "spawning pipeline stage");
        let child = cmd.spawn()?;
        stages.push(child);
    }

    Ok(drains)
}

/// Drain the terminal stage and reap every stage, left to right.
fn collect(
    stages: &mut StageSet,
    stderr_drains: Vec<StderrDrain>,
    description: &str,
) -> io::Result<ProcessResult> {
    let last = stages.len() - 1;

    // Terminal stderr drains on a thread while stdout drains here, so neither
    // pipe can fill up and stall the child before it exits.
    let stderr_reader = spawn_pipe_reader(stages.take_stderr(last));
    let mut stdout_pipe = stages.take_stdout(last)?;
    let mut stdout = Vec::new();
    stdout_pipe.read_to_end(&mut stdout)?;
    drop(stdout_pipe);

    let status = stages.wait(last)?;
    let stderr = join_pipe_reader(stderr_reader);

    // Reap earlier stages in original order so no zombies remain. Their exit
    // codes do not affect the pipeline result.
    for index in 0..last {
        let stage_status = stages.wait(index)?;
        if !stage_status.success() {
            debug!(
                stage = index,
                code = ?stage_status.code(),
                "intermediate stage exited non-zero"
            );
        }
    }

    for drain in stderr_drains {
        let text = join_pipe_reader(Some(drain.handle));
        if !text.trim().is_empty() {
            debug!(stage = drain.stage, stderr = %text.trim(), "intermediate stage diagnostics");
        }
    }

    Ok(ProcessResult {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr,
        exit_code: status.code().unwrap_or(-1),
        command: description.to_string(),
    })
}

struct StderrDrain {
    stage: usize,
    handle: thread::JoinHandle<String>,
}

/// Owning collection of spawned pipeline stages.
///
/// Per-stage lifecycle: spawned, then either reaped by [`StageSet::wait`] or
/// terminated by the drop handler. Once reaped a stage is never touched again.
struct StageSet {
    stages: Vec<Stage>,
}

struct Stage {
    child: Child,
    reaped: bool,
}

impl StageSet {
    fn new() -> Self {
        Self { stages: Vec::new() }
    }

    fn push(&mut self, child: Child) {
        self.stages.push(Stage {
            child,
            reaped: false,
        });
    }

    fn len(&self) -> usize {
        self.stages.len()
    }

    fn take_stdout(&mut self, index: usize) -> io::Result<ChildStdout> {
        self.stages[index].child.stdout.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Other, "stage stdout already consumed")
        })
    }

    fn take_stderr(&mut self, index: usize) -> Option<ChildStderr> {
        self.stages[index].child.stderr.take()
    }

    fn wait(&mut self, index: usize) -> io::Result<ExitStatus> {
        let stage = &mut self.stages[index];
        let status = stage.child.wait()?;
        stage.reaped = true;
        Ok(status)
    }
}

impl Drop for StageSet {
    fn drop(&mut self) {
        for (index, stage) in self.stages.iter_mut().enumerate() {
            if stage.reaped {
                continue;
            }
            // Best effort: termination errors are swallowed, the reap below
            // keeps the process table clean when the kill landed.
            if let Err(err) = stage.child.kill() {
                warn!(stage = index, "failed to terminate stage: {err}");
            }
            let _ = stage.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[cfg(unix)]
    fn sleeping_child() -> Child {
        Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep")
    }

    #[cfg(unix)]
    #[test]
    fn stage_set_drop_terminates_unreaped_children() {
        let child = sleeping_child();
        let pid = child.id();
        {
            let mut stages = StageSet::new();
            stages.push(child);
        }
        // After the set is dropped the process must be gone. Signal 0 probes
        // for existence without delivering anything.
        let alive = unsafe { libc::kill(pid as i32, 0) } == 0;
        assert!(!alive, "stage {pid} still running after StageSet drop");
    }

    #[cfg(unix)]
    #[test]
    fn stage_set_skips_reaped_children() {
        let mut stages = StageSet::new();
        stages.push(
            Command::new("true")
                .spawn()
                .expect("spawn true"),
        );
        let status = stages.wait(0).expect("wait");
        assert!(status.success());
        // Dropping must not try to kill the already-reaped child.
        drop(stages);
    }
}
