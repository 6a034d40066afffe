//! # CLI Module
//!
//! Backs the `switchyard` binary.
//!
//! ## Commands
//!
//! ### `dispatch`
//!
//! Dispatch one request against the demo application:
//!
//! ```bash
//! # command invocation, resolved under App\Commands
//! switchyard dispatch cache/clear
//!
//! # simulated HTTP request, resolved under App\Controllers
//! switchyard dispatch --http /users/7
//! switchyard dispatch --http -X POST -H 'Authorization: Bearer demo-token' /users/7
//! ```
//!
//! ### `routes`
//!
//! Print the route table:
//!
//! ```bash
//! switchyard routes --config app.toml
//! ```

mod commands;
pub mod demo;

#[cfg(test)]
mod tests;

pub use commands::{build_request, load_config, run_cli, Cli, Commands};
