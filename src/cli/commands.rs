//! CLI argument definitions using clap.
//!
//! Positional arguments follow the original script's usage:
//! `<num_executions> <input_file> <output_file_prefix> [<seed>]`.

use clap::Parser;
use std::path::PathBuf;

/// Run a reconciliation solver repeatedly with reproducible random seeds
#[derive(Parser, Debug)]
#[command(name = "multirun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of solver runs
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub num_executions: u32,

    /// Input dataset passed to every run
    pub input_file: String,

    /// Run i writes to <OUTPUT_PREFIX>_i
    pub output_prefix: String,

    /// Seed for the seed stream; derived from the clock when omitted
    #[arg(allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Solver base name (platform suffix is appended)
    #[arg(long)]
    pub solver: Option<String>,

    /// Directory containing the solver builds
    #[arg(long)]
    pub solver_dir: Option<PathBuf>,

    /// Print the commands without running the solver
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
