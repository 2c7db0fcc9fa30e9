//! Process listing and signalling.
//!
//! [`ProcessLister`] abstracts over where the process table comes from:
//! [`NativeLister`] reads it through the `sysinfo` crate (enable the
//! `ps-native` feature), while [`PsLister`] shells out to `ps aux` through the
//! single-command runner and parses the text. [`ps`] uses whichever backend
//! the build compiled in.

use crate::config::ExecConfig;
use crate::error::{Error, Result};
use crate::runner;
use serde::{Deserialize, Serialize};

/// One entry of the process table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
}

/// Source of process-table snapshots.
pub trait ProcessLister {
    /// Take a snapshot of the currently running processes.
    fn processes(&self) -> Result<Vec<ProcessInfo>>;
}

/// Process listing via the `sysinfo` crate.
#[cfg(feature = "ps-native")]
pub struct NativeLister;

#[cfg(feature = "ps-native")]
impl ProcessLister for NativeLister {
    fn processes(&self) -> Result<Vec<ProcessInfo>> {
        let mut sys = sysinfo::System::new_all();
        sys.refresh_all();
        let total_memory = sys.total_memory().max(1);
        let mut entries: Vec<ProcessInfo> = sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessInfo {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                cpu_percent: process.cpu_usage(),
                memory_percent: (process.memory() as f32 / total_memory as f32) * 100.0,
            })
            .collect();
        entries.sort_by_key(|p| p.pid);
        Ok(entries)
    }
}

/// Fallback process listing that parses `ps aux` output.
pub struct PsLister;

impl ProcessLister for PsLister {
    fn processes(&self) -> Result<Vec<ProcessInfo>> {
        let result = runner::run("ps aux", &ExecConfig::new())?;
        if !result.success() {
            return Err(Error::process_list(format!(
                "ps exited with code {}: {}",
                result.exit_code,
                result.stderr.trim()
            )));
        }
        // First line is the header.
        Ok(result
            .stdout
            .lines()
            .skip(1)
            .filter_map(parse_ps_line)
            .collect())
    }
}

/// Parse one `ps aux` data line: USER PID %CPU %MEM VSZ RSS TTY STAT START
/// TIME COMMAND, with the command occupying the rest of the line.
fn parse_ps_line(line: &str) -> Option<ProcessInfo> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 11 {
        return None;
    }
    Some(ProcessInfo {
        pid: fields[1].parse().ok()?,
        name: fields[10..].join(" "),
        cpu_percent: fields[2].parse().ok()?,
        memory_percent: fields[3].parse().ok()?,
    })
}

/// List running processes with the backend selected at build time.
pub fn ps() -> Result<Vec<ProcessInfo>> {
    default_lister().processes()
}

/// The lister compiled into this build: [`NativeLister`] with the `ps-native`
/// feature, [`PsLister`] otherwise.
#[cfg(feature = "ps-native")]
pub fn default_lister() -> impl ProcessLister {
    NativeLister
}

#[cfg(not(feature = "ps-native"))]
pub fn default_lister() -> impl ProcessLister {
    PsLister
}

/// Send a signal to a process, like the `kill` command.
///
/// Returns `true` if the signal was delivered. Unix only; other platforms
/// always return `false`.
#[cfg(unix)]
pub fn kill(pid: u32, signal: i32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, signal) == 0 }
}

#[cfg(not(unix))]
pub fn kill(_pid: u32, _signal: i32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ps_aux_line() {
        let line = "root         1  0.3  0.1 168932 11564 ?        Ss   10:01   0:02 /sbin/init splash";
        let info = parse_ps_line(line).expect("line should parse");
        assert_eq!(info.pid, 1);
        assert_eq!(info.name, "/sbin/init splash");
        assert!((info.cpu_percent - 0.3).abs() < f32::EPSILON);
        assert!((info.memory_percent - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn skips_malformed_lines() {
        assert!(parse_ps_line("").is_none());
        assert!(parse_ps_line("USER PID %CPU").is_none());
        assert!(parse_ps_line("root notapid 0.0 0.0 0 0 ? S 0:00 0:00 cmd").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn ps_fallback_sees_this_process() {
        let me = std::process::id();
        let list = PsLister.processes().expect("ps should run");
        assert!(list.iter().any(|p| p.pid == me), "own pid missing from ps");
    }

    #[cfg(unix)]
    #[test]
    fn kill_probes_with_signal_zero() {
        // Signal 0 checks existence without delivering anything.
        assert!(kill(std::process::id(), 0));
        // Far above any default pid_max, so it cannot name a live process.
        assert!(!kill(999_999_999, 0));
    }
}
