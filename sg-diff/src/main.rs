use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod diff_cmd;
mod inspect_cmd;
mod path_guard;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref(), cli.verbose);

    match cli.command {
        Command::Diff(args) => diff_cmd::run_diff(args),
        Command::Inspect(args) => inspect_cmd::run_inspect(args),
    }
}

fn init_tracing(directive: Option<&str>, verbose: u8) {
    let filter = match (directive, verbose) {
        (Some(directive), _) => EnvFilter::new(directive),
        (None, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (None, 1) => EnvFilter::new("info"),
        (None, 2) => EnvFilter::new("debug"),
        (None, _) => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
