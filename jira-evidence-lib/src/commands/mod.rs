//! Command-line interface and orchestration for jira-evidence
//!
//! This module implements the CLI commands and ties together key extraction, git access,
//! the Jira client, and evidence output.
//!
//! ## Commands
//!
//! - **commit**: Scan the subject of a commit (or of every commit from it up to `HEAD` with
//!   `--range`) for issue keys, fetch the issues, and write the evidence file
//! - **extract**: Same scan as `commit`, printing the keys instead of fetching them
//! - **tickets**: Fetch explicitly named issues and write the evidence file
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The fetching commands share the `common` module, which
//! merges flags, environment variables, and the configuration file into effective settings,
//! sets up logging, and drives the fetch-and-write step.

mod commit;
mod common;
mod config;
mod extract;
mod host;
mod init;
mod run;
mod tickets;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use commit::{CommitArgs, process_commit};
pub use extract::{ExtractArgs, extract_keys};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use tickets::{TicketsArgs, process_tickets};
pub use validate::{ValidateArgs, validate_config};
