//! Synchronous solver execution.
//!
//! The solver inherits the console, so its own output appears unfiltered.
//! There is no timeout: a hung solver blocks the caller.

use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::command::CommandLine;
use crate::error::Result;

/// Exit status of a finished solver process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    pub fn from_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable reason for a failed run
    pub fn describe(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes built commands to completion
pub trait ProcessRunner {
    /// Run the command and block until it exits.
    ///
    /// An `Err` means the process could not be started at all.
    fn execute(&mut self, command: &CommandLine) -> Result<ExecutionResult>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn execute(&mut self, command: &CommandLine) -> Result<ExecutionResult> {
        debug!("Spawning {}", command.program.display());
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .inspect_err(|e| warn!("Failed to start {}: {}", command.program.display(), e))?;

        let result = ExecutionResult {
            exit_code: status.code(),
        };
        debug!("{} exited: {}", command.program.display(), result.describe());
        Ok(result)
    }
}

/// Skips execution and reports success, for `--dry-run`
#[derive(Debug, Default, Clone)]
pub struct DryRunner {
    pub executed: Vec<CommandLine>,
}

impl ProcessRunner for DryRunner {
    fn execute(&mut self, command: &CommandLine) -> Result<ExecutionResult> {
        self.executed.push(command.clone());
        Ok(ExecutionResult::from_code(0))
    }
}
