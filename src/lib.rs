//! multirun - sample independent runs of a reconciliation solver
//!
//! Runs an external solver executable N times on the same input, each run
//! with its own seed drawn from a reproducible seed stream, and reads the
//! reported cost back from every run's output file.

pub mod command;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod platform;
pub mod report;
pub mod runner;
pub mod seed;

pub use error::{MultirunError, Result};
