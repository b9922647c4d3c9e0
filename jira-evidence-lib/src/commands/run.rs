//! Command dispatch logic for jira-evidence

use super::{
    CommitArgs, ExtractArgs, InitArgs, TicketsArgs, ValidateArgs, extract_keys, init_config, process_commit, process_tickets,
    validate_config,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "jira-evidence", author, version, long_about = None)]
#[command(about = "Collect Jira issue evidence for the issues referenced by git commits")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: EvidenceSubcommand,
}

#[derive(Subcommand, Debug)]
enum EvidenceSubcommand {
    /// Find issue keys in commit subjects, fetch the issues, and write the evidence file
    Commit(Box<CommitArgs>),
    /// Print the issue keys found in commit subjects without contacting Jira
    Extract(Box<ExtractArgs>),
    /// Fetch the given issues and write the evidence file
    Tickets(Box<TicketsArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);

    match &cli.command {
        EvidenceSubcommand::Commit(commit_args) => process_commit(host, commit_args).await,
        EvidenceSubcommand::Extract(extract_args) => extract_keys(host, extract_args).await,
        EvidenceSubcommand::Tickets(tickets_args) => process_tickets(host, tickets_args).await,
        EvidenceSubcommand::Init(init_args) => init_config(host, init_args),
        EvidenceSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}
