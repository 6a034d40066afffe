use clap::Parser;
use std::process::ExitCode;
use switchyard::cli::{run_cli, Cli};
use switchyard::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<ExitCode> {
    let _guard = init_logging(&LogConfig::from_env())?;
    run_cli(Cli::parse())
}
