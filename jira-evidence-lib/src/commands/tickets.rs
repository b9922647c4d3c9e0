use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use clap::Parser;
use std::io::Write;

const LOG_TARGET: &str = "  commands";

#[derive(Parser, Debug)]
pub struct TicketsArgs {
    /// Issue keys to fetch, in the order they should appear in the evidence file
    #[arg(value_name = "KEY", required = true)]
    pub keys: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Fetch the given issues and write the evidence file, without looking at git
pub async fn process_tickets<H: Host>(host: &mut H, args: &TicketsArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    let pattern = common.settings.pattern.clone();
    for key in args.keys.iter().filter(|key| !pattern.is_match(key)) {
        log::warn!(target: LOG_TARGET, "'{key}' does not match the issue key pattern '{pattern}'");
        let _ = writeln!(common.host().error(), "⚠️  '{key}' does not look like a JIRA ID, fetching it anyway");
    }

    let _ = writeln!(common.host().output(), "Processing JIRA IDs: {}", args.keys.join(", "));

    let results = common.fetch_and_save(&args.keys).await?;
    if results.error_count() > 0 {
        let _ = writeln!(
            common.host().error(),
            "{} of {} issue(s) could not be retrieved",
            results.error_count(),
            results.len()
        );
    }

    Ok(())
}
