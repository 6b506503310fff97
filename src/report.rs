//! Console reporting of loop progress.

use colored::*;

use crate::command::{CommandLine, RunRequest};
use crate::orchestrator::{RunObserver, RunOutcome, RunReport};
use crate::seed::{SeedSource, SeedStream};

/// Line announcing the stream's initialization value
pub fn seed_banner(stream: &SeedStream) -> String {
    match stream.source() {
        SeedSource::Supplied => format!("Using random seed {}", stream.initial_seed()),
        SeedSource::Clock => format!(
            "Using random seed {} (pass it as the 4th argument to reproduce these runs)",
            stream.initial_seed()
        ),
    }
}

/// Per-run summary table
pub fn summary_table(report: &RunReport) -> String {
    let mut table = format!("{:>5}  {:>5}  {}\n", "run", "seed", "result");
    for outcome in &report.outcomes {
        let result = match (&outcome.extraction, outcome.succeeded) {
            (Some(extraction), _) => extraction.to_string(),
            (None, false) => "(failed)".to_string(),
            (None, true) => String::new(),
        };
        table.push_str(&format!(
            "{:>5}  {:>5}  {}\n",
            outcome.run_index, outcome.seed, result
        ));
    }
    table
}

/// Prints progress lines to stdout
pub struct ConsoleReporter {
    solver: String,
    summary: bool,
}

impl ConsoleReporter {
    pub fn new(solver: impl Into<String>) -> Self {
        Self {
            solver: solver.into(),
            summary: true,
        }
    }

    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }
}

impl RunObserver for ConsoleReporter {
    fn run_started(&mut self, request: &RunRequest, command: &CommandLine) {
        println!(
            "\n{} {}",
            format!("Executing Run #{}:", request.run_index()).cyan(),
            command
        );
    }

    fn run_succeeded(&mut self, outcome: &RunOutcome) {
        println!("{}", "Execution Successful.".green());
        if let Some(extraction) = &outcome.extraction {
            match extraction.failure_message(&outcome.output_path) {
                Some(message) => println!("{}", message.yellow()),
                None => println!("{}", extraction),
            }
        }
    }

    fn run_failed(&mut self, _request: &RunRequest, reason: &str) {
        println!("{} ({})", "Execution Failed.".red(), reason);
    }

    fn loop_finished(&mut self, report: &RunReport) {
        if !report.is_completed() {
            return;
        }
        println!(
            "\n{}",
            format!("{} runs of {} completed.", report.outcomes.len(), self.solver).green()
        );
        if self.summary {
            print!("\n{}", summary_table(report));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extraction;
    use crate::orchestrator::LoopState;
    use std::path::PathBuf;

    fn outcome(run_index: u32, seed: u32, extraction: Option<Extraction>) -> RunOutcome {
        RunOutcome {
            run_index,
            seed,
            succeeded: extraction.is_some(),
            output_path: PathBuf::from(format!("out_{}", run_index)),
            extraction,
        }
    }

    #[test]
    fn test_seed_banner() {
        let stream = SeedStream::init(Some(42));
        assert_eq!(seed_banner(&stream), "Using random seed 42");

        let clocked = SeedStream::init(None);
        let banner = seed_banner(&clocked);
        assert!(banner.starts_with(&format!("Using random seed {}", clocked.initial_seed())));
    }

    #[test]
    fn test_summary_table() {
        let report = RunReport {
            state: LoopState::Completed(2),
            outcomes: vec![
                outcome(1, 812, Some(Extraction::Found("cost 17".to_string()))),
                outcome(2, 9, Some(Extraction::Missing)),
            ],
            failure: None,
        };
        let table = summary_table(&report);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("812") && lines[1].ends_with("cost 17"));
        assert!(lines[2].ends_with("(missing)"));
    }

    #[test]
    fn test_summary_marks_failed_run() {
        let report = RunReport {
            state: LoopState::Aborted(1),
            outcomes: vec![outcome(1, 5, None)],
            failure: Some("exit code 1".to_string()),
        };
        assert!(summary_table(&report).contains("(failed)"));
    }
}
