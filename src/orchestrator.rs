//! Run orchestration loop.
//!
//! Each iteration draws a seed, builds the solver command, runs it to
//! completion and reads the metric back. The first failed run aborts the
//! loop; later runs are never built.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::command::{CommandBuilder, CommandLine, RunRequest};
use crate::error::{MultirunError, Result};
use crate::extract::{Extraction, extract};
use crate::runner::ProcessRunner;
use crate::seed::SeedStream;

/// What to run: how many times, on which input, writing where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub num_executions: u32,
    pub input_path: String,
    pub output_prefix: String,
}

impl RunPlan {
    pub fn new(
        num_executions: u32,
        input_path: impl Into<String>,
        output_prefix: impl Into<String>,
    ) -> Result<Self> {
        if num_executions == 0 {
            return Err(MultirunError::InvalidArgument(
                "the number of executions must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            num_executions,
            input_path: input_path.into(),
            output_prefix: output_prefix.into(),
        })
    }
}

/// Loop driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running(u32),
    /// All runs attempted
    Completed(u32),
    /// Run failed; nothing after it was attempted
    Aborted(u32),
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Completed(_) | LoopState::Aborted(_))
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub run_index: u32,
    pub seed: u32,
    pub succeeded: bool,
    pub output_path: PathBuf,
    /// Set only for succeeded runs
    pub extraction: Option<Extraction>,
}

impl RunOutcome {
    pub fn extracted_line(&self) -> Option<&str> {
        self.extraction.as_ref().and_then(Extraction::line)
    }
}

/// Everything the loop produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: LoopState,
    pub outcomes: Vec<RunOutcome>,
    pub failure: Option<String>,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.state, LoopState::Completed(_))
    }

    /// Turn an aborted loop into an `ExecutionFailure`
    pub fn into_result(self) -> Result<Self> {
        match self.state {
            LoopState::Aborted(run_index) => Err(MultirunError::ExecutionFailure {
                run_index,
                reason: self.failure.unwrap_or_default(),
            }),
            _ => Ok(self),
        }
    }
}

/// Receives progress from the loop
pub trait RunObserver {
    fn run_started(&mut self, _request: &RunRequest, _command: &CommandLine) {}

    /// Solver exited zero; `outcome.extraction` is set
    fn run_succeeded(&mut self, _outcome: &RunOutcome) {}

    fn run_failed(&mut self, _request: &RunRequest, _reason: &str) {}

    fn loop_finished(&mut self, _report: &RunReport) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Drives the runs of a plan
pub struct Orchestrator<R: ProcessRunner> {
    plan: RunPlan,
    builder: CommandBuilder,
    runner: R,
    seeds: SeedStream,
    state: LoopState,
}

impl<R: ProcessRunner> Orchestrator<R> {
    pub fn new(plan: RunPlan, builder: CommandBuilder, runner: R, seeds: SeedStream) -> Self {
        Self {
            plan,
            builder,
            runner,
            seeds,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn seeds(&self) -> &SeedStream {
        &self.seeds
    }

    /// Execute the plan once.
    ///
    /// Returns `Err` only for problems found before the first run (or a
    /// second call). A failed run yields an `Aborted` report.
    pub fn run(&mut self, observer: &mut dyn RunObserver) -> Result<RunReport> {
        if self.state != LoopState::Idle {
            return Err(MultirunError::InvalidArgument(format!(
                "loop already ran ({:?})",
                self.state
            )));
        }
        self.builder.platform().ensure_supported()?;
        info!(
            "Starting {} run(s) on {} with seed {}",
            self.plan.num_executions,
            self.plan.input_path,
            self.seeds.initial_seed()
        );

        let mut outcomes = Vec::with_capacity(self.plan.num_executions as usize);
        for run_index in 1..=self.plan.num_executions {
            let seed = self.seeds.next_seed();
            let request = RunRequest::new(
                run_index,
                self.plan.input_path.as_str(),
                self.plan.output_prefix.as_str(),
                seed,
            )?;
            let command = self.builder.build(&request)?;
            self.state = LoopState::Running(run_index);
            observer.run_started(&request, &command);

            let reason = match self.runner.execute(&command) {
                Ok(result) if result.success() => None,
                Ok(result) => Some(result.describe()),
                Err(e) => Some(e.to_string()),
            };

            if let Some(reason) = reason {
                warn!("Run #{} failed: {}", run_index, reason);
                self.state = LoopState::Aborted(run_index);
                outcomes.push(RunOutcome {
                    run_index,
                    seed,
                    succeeded: false,
                    output_path: request.output_path(),
                    extraction: None,
                });
                observer.run_failed(&request, &reason);
                let report = RunReport {
                    state: self.state,
                    outcomes,
                    failure: Some(reason),
                };
                observer.loop_finished(&report);
                return Ok(report);
            }

            let output_path = request.output_path();
            let extraction = extract(&output_path);
            if let Some(err) = extraction.as_error(&output_path) {
                warn!("Run #{}: {}", run_index, err);
            }
            let outcome = RunOutcome {
                run_index,
                seed,
                succeeded: true,
                output_path,
                extraction: Some(extraction),
            };
            debug!("Run #{} outcome: {:?}", run_index, outcome);
            observer.run_succeeded(&outcome);
            outcomes.push(outcome);
        }

        self.state = LoopState::Completed(self.plan.num_executions);
        info!("Completed {} run(s)", self.plan.num_executions);
        let report = RunReport {
            state: self.state,
            outcomes,
            failure: None,
        };
        observer.loop_finished(&report);
        Ok(report)
    }
}
