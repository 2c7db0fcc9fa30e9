//! Command-line interface over the process engine.
//!
//! ## Usage
//!
//! ```bash
//! # Run a single command and print its output
//! pipexec run "ls -la"
//!
//! # Chain commands with pipes
//! pipexec pipe "cat access.log" "grep 500" "wc -l"
//!
//! # Locate a binary
//! pipexec which rustc
//!
//! # List running processes as JSON
//! pipexec ps --json
//! ```

use crate::{pipe, ps, run, which, ExecConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pipexec", version, about = "Run commands and shell-style pipelines")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single command
    Run {
        /// The command to execute
        command: String,

        /// Treat the command as an argv vector instead of a shell line
        #[arg(long)]
        no_shell: bool,

        /// Working directory for the command
        #[arg(long)]
        cwd: Option<String>,

        /// Maximum wall-clock seconds before the command is terminated
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the full result as JSON instead of raw output
        #[arg(long)]
        json: bool,
    },

    /// Chain commands together with pipes
    Pipe {
        /// Commands to chain, in order
        #[arg(required = true)]
        commands: Vec<String>,

        /// Treat each command as an argv vector instead of a shell line
        #[arg(long)]
        no_shell: bool,

        /// Print the full result as JSON instead of raw output
        #[arg(long)]
        json: bool,
    },

    /// Find the full path of a program
    Which {
        /// Program name to look up
        program: String,
    },

    /// List running processes
    Ps {
        /// Print the process table as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the parsed command. Returns the exit code for the process.
    pub fn execute(self) -> Result<i32> {
        match self.command {
            Commands::Run {
                command,
                no_shell,
                cwd,
                timeout,
                json,
            } => {
                let mut config = ExecConfig::new().shell(!no_shell);
                if let Some(dir) = cwd {
                    config = config.working_dir(dir);
                }
                if let Some(secs) = timeout {
                    config = config.timeout(Duration::from_secs(secs));
                }
                let result = run(&command, &config)?;
                print_result(&result, json)?;
                Ok(result.exit_code)
            }
            Commands::Pipe {
                commands,
                no_shell,
                json,
            } => {
                let result = pipe(&commands, !no_shell)?;
                print_result(&result, json)?;
                Ok(result.exit_code)
            }
            Commands::Which { program } => match which(&program) {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(0)
                }
                None => {
                    eprintln!("{program} not found");
                    Ok(1)
                }
            },
            Commands::Ps { json } => {
                let processes = ps()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&processes)?);
                } else {
                    println!("{:>8}  {:>5}  {:>5}  NAME", "PID", "%CPU", "%MEM");
                    for p in &processes {
                        println!(
                            "{:>8}  {:>5.1}  {:>5.1}  {}",
                            p.pid, p.cpu_percent, p.memory_percent, p.name
                        );
                    }
                }
                Ok(0)
            }
        }
    }
}

fn print_result(result: &crate::ProcessResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    let mut stdout = std::io::stdout();
    stdout.write_all(result.stdout.as_bytes())?;
    stdout.flush()?;
    if !result.stderr.is_empty() {
        let mut stderr = std::io::stderr();
        stderr.write_all(result.stderr.as_bytes())?;
        stderr.flush()?;
    }
    Ok(())
}
