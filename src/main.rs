// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! `timesheet` binary: parses the command, runs it, reports warnings on
//! stderr and exits non-zero only on I/O or parse failures.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::io;
use std::process;
use std::time::Duration;
use timesheet::cli::{is_usage_error, Cli, Command};
use timesheet::report::format_duration;
use timesheet::{
    Config, Controller, ReportResult, StartOutcome, Status, StopResult, SystemClock,
};
use tracing_subscriber::EnvFilter;

const TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_usage() -> anyhow::Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        return print_usage();
    };
    let config = Config::new(cli.data, cli.verbose)?;
    tracing::debug!(data = %config.data_path.display(), ?command, "dispatching");
    let ctl = Controller::new(config.state_store(), SystemClock);

    match command {
        Command::Status => match ctl.status().context("could not read timer state")? {
            Status::Running { since, elapsed } => println!(
                "Elapsed time: {} (started {})",
                humantime::format_duration(Duration::from_secs(elapsed.as_secs())),
                since.format(TIME_FORMAT)
            ),
            Status::Idle => eprintln!("Timer not started"),
        },
        Command::Start => match ctl.start().context("could not start the timer")? {
            StartOutcome::Started { at } => println!("Started at {}", at.format(TIME_FORMAT)),
            StartOutcome::AlreadyRunning { since } => eprintln!(
                "Timer already started at {}; start time unchanged",
                since.format(TIME_FORMAT)
            ),
        },
        Command::Stop => match ctl.stop().context("could not stop the timer")? {
            StopResult::Stopped { elapsed, logged } => println!(
                "Stopped after {}; total for today {}",
                format_duration(elapsed),
                format_duration(logged.entry().duration)
            ),
            StopResult::NotRunning => eprintln!("Timer not started"),
            StopResult::LogPathUnset => {
                eprintln!("Log path not set; run `timesheet setLogPath <path>` first")
            }
        },
        Command::Table => {
            let out = io::stdout().lock();
            if ctl.report(out).context("could not print the table")? == ReportResult::LogPathUnset {
                eprintln!("Log path not set; run `timesheet setLogPath <path>` first");
            }
        }
        Command::SetLogPath { path } => {
            let stored = ctl.set_log_path(&path).context("could not set the log path")?;
            println!("Log path set to {}", stored.display());
        }
    }
    Ok(())
}

fn main() {
    // Default SIGPIPE so `timesheet table | head` ends quietly.
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if is_usage_error(&e) => {
            if let Err(e) = print_usage() {
                eprintln!("error: {:#}", e);
                process::exit(1);
            }
            return;
        }
        Err(e) => e.exit(),
    };
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
