use super::Host;
use super::common::{Common, CommonArgs, CommitSelection};
use crate::Result;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub selection: CommitSelection,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Print the issue keys found in commit subjects, comma-separated, without contacting Jira
pub async fn extract_keys<H: Host>(host: &mut H, args: &ExtractArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    let Some(keys) = common.keys_from_git(&args.selection, false).await? else {
        return Ok(());
    };

    if keys.is_empty() {
        let _ = writeln!(common.host().output(), "No JIRA IDs found");
    } else {
        let _ = writeln!(common.host().output(), "{}", keys.join(","));
    }

    Ok(())
}
