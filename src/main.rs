use clap::Parser;
use clap::error::ErrorKind;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use config::Config;
use multirun::command::CommandBuilder;
use multirun::orchestrator::{Orchestrator, RunObserver, RunPlan, RunReport};
use multirun::platform::Platform;
use multirun::report::{ConsoleReporter, seed_banner};
use multirun::runner::{DryRunner, ProcessRunner, SystemRunner};
use multirun::seed::SeedStream;

/// RUST_LOG wins over the config's `log_level`
fn setup_logging(config_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("multirun")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("multirun.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let filters = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| config_level.map(str::to_string))
        .unwrap_or_else(|| "info".to_string());

    env_logger::Builder::new()
        .parse_filters(&filters)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Parse arguments; usage errors exit with status 1
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

fn drive<R: ProcessRunner>(
    plan: RunPlan,
    builder: CommandBuilder,
    runner: R,
    seeds: SeedStream,
    observer: &mut dyn RunObserver,
) -> Result<RunReport> {
    let mut orchestrator = Orchestrator::new(plan, builder, runner, seeds);
    let report = orchestrator.run(observer)?;
    Ok(report)
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let seeds = SeedStream::init(cli.seed);
    println!("{}", seed_banner(&seeds));

    let platform = Platform::detect();
    if platform.is_fallback() {
        println!("{}", "Unknown OS; Proceeding assuming Linux...".yellow());
    }
    if let Err(e) = platform.ensure_supported() {
        println!(
            "{}",
            "This tool currently only works for Linux and macOS operating systems".red()
        );
        return Err(e.into());
    }

    let solver = config.solver.to_spec();
    if cli.is_verbose() {
        println!("{} {}", "Platform:".yellow(), platform);
        println!("{} {}", "Solver:".yellow(), solver.dir.join(&solver.name).display());
    }

    let plan = RunPlan::new(cli.num_executions, cli.input_file.as_str(), cli.output_prefix.as_str())?;
    let builder = CommandBuilder::new(platform, solver.clone());
    let mut reporter = ConsoleReporter::new(solver.name).with_summary(config.report.summary);

    let report = if cli.dry_run {
        println!("{}", "Dry run: the solver will not be executed".yellow());
        drive(plan, builder, DryRunner::default(), seeds, &mut reporter)?
    } else {
        drive(plan, builder, SystemRunner::new(), seeds, &mut reporter)?
    };

    report.into_result()?;
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = parse_cli();

    // Load configuration
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_overrides(cli.solver.as_deref(), cli.solver_dir.as_deref());

    // Logging level comes from the config, so it starts second
    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
