use super::Host;
use super::common::{Common, CommonArgs, CommitSelection};
use crate::Result;
use crate::git::CommitScope;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CommitArgs {
    #[command(flatten)]
    pub selection: CommitSelection,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Extract issue keys from commit subjects, fetch the issues, and write the evidence file
pub async fn process_commit<H: Host>(host: &mut H, args: &CommitArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let selection = &args.selection;

    let heading = match selection.scope() {
        CommitScope::Single => "Commit",
        CommitScope::Range => "Start Commit",
    };

    let banner = format!(
        "=== JIRA Details Fetching Process ===\n{heading}: {}\nJIRA ID Regex: {}\nOutput File: {}\n",
        selection.commit, common.settings.pattern, common.settings.output
    );
    let _ = writeln!(common.host().output(), "{banner}");
    let _ = writeln!(common.host().output(), "Step 1: Extracting JIRA IDs...");

    let Some(keys) = common.keys_from_git(selection, true).await? else {
        return Ok(());
    };

    if keys.is_empty() {
        let _ = writeln!(common.host().output(), "No JIRA IDs found");
        return Ok(());
    }

    let _ = writeln!(common.host().output(), "Found JIRA IDs: {}", keys.join(", "));
    let _ = writeln!(common.host().output(), "\nStep 2: Fetching JIRA details...");

    let results = common.fetch_and_save(&keys).await?;

    let _ = writeln!(
        common.host().output(),
        "\n=== Process completed: {} issue(s), {} could not be retrieved ===",
        results.len(),
        results.error_count()
    );

    Ok(())
}
