//! Settings and processing shared between the commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::evidence::ResultSet;
use crate::git::{CommitScope, Repository};
use crate::jira::{Client, Credentials};
use crate::keys::KeyPattern;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use ohno::{IntoAppError, app_err, bail};
use std::io::Write;
use url::Url;

const LOG_TARGET: &str = "  commands";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    #[default]
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by the commit, extract, and tickets commands
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Regular expression matching Jira issue keys (default is `[A-Z]+-[0-9]+`)
    #[arg(long, short = 'r', value_name = "PATTERN", env = "JIRA_ID_REGEX")]
    pub regex: Option<String>,

    /// Where to write the evidence JSON (default is `transformed_jira_data.json`)
    #[arg(long, short = 'o', value_name = "PATH", env = "OUTPUT_FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Base URL of the Jira instance
    #[arg(long, value_name = "URL", env = "JIRA_URL", help_heading = "Jira")]
    pub jira_url: Option<String>,

    /// Jira user the API token belongs to
    #[arg(long, value_name = "NAME", env = "JIRA_USERNAME", help_heading = "Jira")]
    pub jira_username: Option<String>,

    /// Jira API token
    #[arg(long, value_name = "TOKEN", env = "JIRA_API_TOKEN", hide_env_values = true, help_heading = "Jira")]
    pub jira_token: Option<String>,

    /// Path to configuration file (default is `jira-evidence.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Which commits to scan for issue keys
#[derive(Args, Debug)]
pub struct CommitSelection {
    /// Commit whose subject is scanned for issue keys
    #[arg(value_name = "COMMIT")]
    pub commit: String,

    /// Scan every commit after COMMIT up to HEAD instead of COMMIT alone
    #[arg(long)]
    pub range: bool,

    /// Run git in this directory instead of the current one
    #[arg(long, short = 'C', value_name = "PATH")]
    pub repo: Option<Utf8PathBuf>,
}

impl CommitSelection {
    #[must_use]
    pub const fn scope(&self) -> CommitScope {
        if self.range { CommitScope::Range } else { CommitScope::Single }
    }

    fn describe(&self) -> String {
        match self.scope() {
            CommitScope::Single => format!("commit {}", self.commit),
            CommitScope::Range => format!("commit range {}..HEAD", self.commit),
        }
    }
}

/// Effective settings after merging flags, environment, configuration file, and defaults
#[derive(Debug)]
pub struct Settings {
    pub pattern: KeyPattern,
    pub output: Utf8PathBuf,
    pub config: Config,
    jira_url: Option<String>,
    jira_username: Option<String>,
    jira_token: Option<String>,
}

impl Settings {
    /// Merge the command-line arguments with the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or the key pattern does not compile
    pub fn resolve(args: &CommonArgs) -> Result<Self> {
        let config = Config::load(Utf8Path::new("."), args.config.as_deref())?;

        let pattern = args
            .regex
            .as_deref()
            .filter(|regex| !regex.trim().is_empty())
            .unwrap_or(config.id_pattern.as_str());
        let pattern = KeyPattern::new(pattern)?;
        let output = args
            .output
            .clone()
            .filter(|path| !path.as_str().is_empty())
            .unwrap_or_else(|| config.output.clone());

        let jira_url = non_empty(args.jira_url.as_deref())
            .or_else(|| non_empty(config.jira_url.as_deref()))
            .map(str::to_string);
        let jira_username = non_empty(args.jira_username.as_deref())
            .or_else(|| non_empty(config.jira_username.as_deref()))
            .map(str::to_string);
        let jira_token = non_empty(args.jira_token.as_deref()).map(str::to_string);

        log::debug!(target: LOG_TARGET, "Using issue key pattern '{pattern}', output '{output}'");

        Ok(Self {
            pattern,
            output,
            config,
            jira_url,
            jira_username,
            jira_token,
        })
    }

    /// The Jira credentials, all three of which must be configured.
    ///
    /// # Errors
    ///
    /// Returns an error naming the environment variable of the first missing setting, or if the URL is invalid
    pub fn credentials(&self) -> Result<Credentials> {
        let url = required(self.jira_url.as_deref(), "JIRA_URL", "--jira-url")?;
        let username = required(self.jira_username.as_deref(), "JIRA_USERNAME", "--jira-username")?;
        let token = required(self.jira_token.as_deref(), "JIRA_API_TOKEN", "--jira-token")?;

        let url = Url::parse(url).into_app_err_with(|| format!("invalid Jira URL '{url}'"))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            bail!("invalid Jira URL '{url}': expected an http or https URL");
        }

        Ok(Credentials {
            url,
            username: username.to_string(),
            token: token.to_string(),
        })
    }

    /// A Jira client configured from these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are incomplete or the HTTP client cannot be created
    pub fn client(&self) -> Result<Client> {
        Client::new(self.credentials()?, self.config.api_version, self.config.request_timeout())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, env_var: &str, flag: &str) -> Result<&'a str> {
    value.ok_or_else(|| app_err!("{env_var} is not set (set the environment variable or pass {flag})"))
}

pub struct Common<'a, H: Host> {
    pub settings: Settings,
    host: &'a mut H,
}

impl<'a, H: Host> Common<'a, H> {
    /// Initialize logging and resolve the settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be resolved
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        Ok(Self {
            settings: Settings::resolve(args)?,
            host,
        })
    }

    pub fn host(&mut self) -> &mut H {
        self.host
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        // a logger may already be installed when commands run more than once in a process
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    /// Collect the issue keys mentioned by the selected commits.
    ///
    /// Returns `None` if `HEAD` does not resolve to a commit. That condition has been reported to
    /// the host and is not treated as a failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not a git repository, the commit is invalid, or git fails
    pub async fn keys_from_git(&mut self, selection: &CommitSelection, announce: bool) -> Result<Option<Vec<String>>> {
        let repo = Repository::new(selection.repo.as_deref());
        repo.ensure_repository().await?;

        if let Err(e) = repo.verify_head().await {
            let _ = writeln!(self.host.error(), "❌ {e}");
            return Ok(None);
        }

        let info = repo.branch_info().await?;
        if announce {
            let _ = writeln!(self.host.output(), "Branch: {}", info.branch);
            let _ = writeln!(self.host.output(), "Latest Commit: {}", info.commit);
        } else {
            log::info!(target: LOG_TARGET, "Branch '{}', latest commit {}", info.branch, info.commit);
        }

        let subjects = repo.commit_subjects(&selection.commit, selection.scope()).await?;

        // in range mode the issue of the latest commit leads, when it also matches the configured pattern
        let seed = match selection.scope() {
            CommitScope::Range => KeyPattern::default_pattern().first_key(&info.subject).map(str::to_string),
            CommitScope::Single => None,
        };

        let keys = self.settings.pattern.extract_keys(&subjects, seed.as_deref());
        if keys.is_empty() {
            let _ = writeln!(self.host.error(), "⚠️  No JIRA IDs found in {}", selection.describe());
        }

        Ok(Some(keys))
    }

    /// Fetch every key from Jira and write the evidence file.
    ///
    /// Issues that cannot be fetched are reported to the host and recorded as error records.
    ///
    /// # Errors
    ///
    /// Returns an error if the Jira settings are incomplete or the evidence file cannot be written
    pub async fn fetch_and_save(&mut self, keys: &[String]) -> Result<ResultSet> {
        let client = self.settings.client()?;
        log::info!(target: LOG_TARGET, "Fetching {} issue(s) from '{}'", keys.len(), client.base_url());

        let host = &mut *self.host;
        let results = ResultSet::collect(&client, keys, |key, reason| {
            let _ = writeln!(host.error(), "Failed to fetch JIRA {key}: {reason}");
        })
        .await;

        results.write_to(&self.settings.output)?;
        log::info!(
            target: LOG_TARGET,
            "Wrote {} record(s), {} of them errors",
            results.len(),
            results.error_count()
        );

        let _ = writeln!(self.host.output(), "JIRA data saved to: {}", self.settings.output);
        Ok(results)
    }
}
