//! CLI module for multirun - command-line arguments and options.

pub mod commands;

pub use commands::Cli;
