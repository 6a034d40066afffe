use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use super::demo;
use crate::config::AppConfig;
use crate::router::Request;

/// Command-line interface for switchyard
///
/// Dispatches requests against the bundled demo application, either as a
/// command invocation or as a simulated HTTP request.
#[derive(Parser, Debug)]
#[command(name = "switchyard")]
#[command(about = "switchyard request dispatcher", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "SWITCHYARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one request and print the response
    Dispatch {
        /// Command path (CLI mode) or request target such as `/users/7?tab=1` (HTTP mode)
        target: Option<String>,

        /// Simulate an HTTP request instead of a command invocation
        #[arg(long, default_value_t = false)]
        http: bool,

        /// HTTP method (HTTP mode only; commands always use GET)
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Request header `Name: value` (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
    /// List the route table
    Routes,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("invalid header `{raw}`, expected `Name: value`"))
}

/// Load configuration: the file if given, else defaults, then environment overrides.
///
/// # Errors
///
/// Unreadable or invalid configuration file.
pub fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::from_env()),
    }
}

/// Build the request described by a `dispatch` invocation.
#[must_use]
pub fn build_request(target: Option<&str>, http: bool, method: &str, headers: &[(String, String)]) -> Request {
    let mut request = if http {
        Request::http(&method.to_uppercase(), target.unwrap_or("/"))
    } else {
        Request::cli(target)
    };
    for (name, value) in headers {
        request = request.with_header(name, value.clone());
    }
    request
}

/// Run the parsed command line.
///
/// # Errors
///
/// Configuration, route definition and output failures. Dispatch failures
/// are reported on stderr and turned into a failing exit code instead.
pub fn run_cli(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_ref())?;
    let dispatcher = demo::dispatcher(config)?;

    match &cli.command {
        Commands::Dispatch {
            target,
            http,
            method,
            headers,
        } => {
            let request = build_request(target.as_deref(), *http, method, headers);
            match dispatcher.handle(&request) {
                Ok(response) => {
                    let mut out = io::stdout().lock();
                    response.send(&mut out)?;
                    writeln!(out)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{} {}", err.status_code(), err);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Routes => {
            dispatcher.router().dump_routes();
            Ok(ExitCode::SUCCESS)
        }
    }
}
