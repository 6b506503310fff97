//! Per-run solver invocation.
//!
//! A [`RunRequest`] describes one run; [`CommandBuilder`] turns it into a
//! [`CommandLine`], a program plus argument list that is executed directly,
//! never through a shell.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{MultirunError, Result};
use crate::platform::Platform;
use crate::seed::{SEED_MAX, SEED_MIN};

/// Default solver base name; the platform suffix is appended
pub const DEFAULT_SOLVER: &str = "DupLoss-2";

/// Output path of run `run_index` (1-indexed)
pub fn output_path(output_prefix: &str, run_index: u32) -> PathBuf {
    PathBuf::from(format!("{}_{}", output_prefix, run_index))
}

/// Everything needed to launch a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    run_index: u32,
    input_path: String,
    output_prefix: String,
    seed: u32,
}

impl RunRequest {
    pub fn new(
        run_index: u32,
        input_path: impl Into<String>,
        output_prefix: impl Into<String>,
        seed: u32,
    ) -> Result<Self> {
        if run_index == 0 {
            return Err(MultirunError::InvalidArgument(
                "run index is 1-based".to_string(),
            ));
        }
        if !(SEED_MIN..=SEED_MAX).contains(&seed) {
            return Err(MultirunError::InvalidArgument(format!(
                "seed {} outside [{}, {}]",
                seed, SEED_MIN, SEED_MAX
            )));
        }
        Ok(Self {
            run_index,
            input_path: input_path.into(),
            output_prefix: output_prefix.into(),
            seed,
        })
    }

    pub fn run_index(&self) -> u32 {
        self.run_index
    }

    pub fn input_path(&self) -> &str {
        &self.input_path
    }

    pub fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// `<output_prefix>_<run_index>`
    pub fn output_path(&self) -> PathBuf {
        output_path(&self.output_prefix, self.run_index)
    }
}

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Value following `flag`, if present
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Which solver to run and where it lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSpec {
    /// Base name without platform suffix
    pub name: String,
    /// Directory holding the solver builds
    pub dir: PathBuf,
}

impl Default for SolverSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_SOLVER.to_string(),
            dir: PathBuf::from("."),
        }
    }
}

impl SolverSpec {
    pub fn new(name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

/// Builds solver invocations for a fixed platform and solver
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    platform: Platform,
    solver: SolverSpec,
}

impl CommandBuilder {
    pub fn new(platform: Platform, solver: SolverSpec) -> Self {
        Self { platform, solver }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Path of the solver executable for this platform
    pub fn executable(&self) -> Result<PathBuf> {
        let binary = self.platform.binary_name(&self.solver.name)?;
        Ok(self.solver.dir.join(binary))
    }

    /// `<solver> --quiet -i <input> --seed <seed> -o <output>`
    pub fn build(&self, request: &RunRequest) -> Result<CommandLine> {
        let command = CommandLine::new(self.executable()?)
            .arg("--quiet")
            .arg("-i")
            .arg(request.input_path())
            .arg("--seed")
            .arg(request.seed().to_string())
            .arg("-o")
            .arg(request.output_path().to_string_lossy());
        debug!("Run #{} command: {}", request.run_index(), command);
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_builder() -> CommandBuilder {
        CommandBuilder::new(Platform::Linux, SolverSpec::default())
    }

    #[test]
    fn test_output_path_suffix() {
        assert_eq!(output_path("out", 1), PathBuf::from("out_1"));
        assert_eq!(output_path("results/run", 12), PathBuf::from("results/run_12"));
    }

    #[test]
    fn test_run_request_validation() {
        assert!(RunRequest::new(0, "in", "out", 5).is_err());
        assert!(RunRequest::new(1, "in", "out", 0).is_err());
        assert!(RunRequest::new(1, "in", "out", 10_001).is_err());
        assert!(RunRequest::new(1, "in", "out", 10_000).is_ok());
    }

    #[test]
    fn test_build_flag_order() {
        let request = RunRequest::new(2, "data.txt", "out", 1234).unwrap();
        let command = linux_builder().build(&request).unwrap();

        assert_eq!(command.program, PathBuf::from("./DupLoss-2.linux"));
        assert_eq!(
            command.args,
            vec!["--quiet", "-i", "data.txt", "--seed", "1234", "-o", "out_2"]
        );
    }

    #[test]
    fn test_display_matches_shell_form() {
        let request = RunRequest::new(1, "data.txt", "out", 7).unwrap();
        let command = linux_builder().build(&request).unwrap();
        assert_eq!(
            command.to_string(),
            "./DupLoss-2.linux --quiet -i data.txt --seed 7 -o out_1"
        );
    }

    #[test]
    fn test_mac_binary() {
        let builder = CommandBuilder::new(Platform::MacOs, SolverSpec::default());
        assert_eq!(builder.executable().unwrap(), PathBuf::from("./DupLoss-2.mac"));
    }

    #[test]
    fn test_unknown_platform_uses_linux_binary() {
        let builder = CommandBuilder::new(
            Platform::UnknownFallback("plan9".to_string()),
            SolverSpec::default(),
        );
        assert_eq!(builder.executable().unwrap(), PathBuf::from("./DupLoss-2.linux"));
    }

    #[test]
    fn test_unsupported_platform_errors() {
        let builder = CommandBuilder::new(
            Platform::Unsupported("windows".to_string()),
            SolverSpec::default(),
        );
        let request = RunRequest::new(1, "in", "out", 1).unwrap();
        assert!(matches!(
            builder.build(&request),
            Err(MultirunError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_arguments_are_not_interpreted() {
        let request = RunRequest::new(1, "my data; rm -rf x.txt", "out $(id)", 3).unwrap();
        let command = linux_builder().build(&request).unwrap();
        assert_eq!(command.flag_value("-i"), Some("my data; rm -rf x.txt"));
        assert_eq!(command.flag_value("-o"), Some("out $(id)_1"));
    }

    #[test]
    fn test_custom_solver_dir() {
        let builder = CommandBuilder::new(Platform::Linux, SolverSpec::new("Solver", "/opt/bin"));
        assert_eq!(builder.executable().unwrap(), PathBuf::from("/opt/bin/Solver.linux"));
    }
}
