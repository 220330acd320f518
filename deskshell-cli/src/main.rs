//! Deskshell command-line front end
//!
//! Drives the settings store and theme registry the way the desktop shell's
//! main window does.

mod app;
mod cli;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use deskshell_core::{AppPaths, LoadMode};
use tracing_subscriber::EnvFilter;

use app::{Outcome, Shell};
use cli::{Args, Command};

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,deskshell={default_level},deskshell_core={default_level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting Deskshell v{}", deskshell_core::VERSION);

    match run(args) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Refused(message)) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<Outcome> {
    let paths = resolve_paths(&args)?;
    let mode = if args.strict {
        LoadMode::Strict
    } else {
        LoadMode::Lenient
    };
    tracing::debug!(root = %paths.root().display(), ?mode, "Resolved application root");

    let mut shell = match args.command {
        Command::Init => Shell::init(&paths, mode)?,
        _ => Shell::open(&paths, mode)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    shell.run(args.command, &mut out)
}

fn resolve_paths(args: &Args) -> Result<AppPaths> {
    if args.user {
        return AppPaths::user_default();
    }
    Ok(match &args.root {
        Some(root) => AppPaths::under(root),
        None => AppPaths::relative(),
    })
}
