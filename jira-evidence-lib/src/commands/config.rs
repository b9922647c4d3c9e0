use crate::Result;
use crate::keys::KeyPattern;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the current directory when no configuration path is given
pub const DEFAULT_CONFIG_FILE: &str = "jira-evidence.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Regular expression matching issue keys
    #[serde(default = "default_id_pattern")]
    pub id_pattern: String,

    /// Where the evidence file is written
    #[serde(default = "default_output")]
    pub output: Utf8PathBuf,

    /// Base URL of the Jira instance
    #[serde(default)]
    pub jira_url: Option<String>,

    /// Jira user the API token belongs to
    #[serde(default)]
    pub jira_username: Option<String>,

    /// Jira REST API version (2 or 3)
    #[serde(default = "default_api_version")]
    pub api_version: u8,

    /// Upper bound on each Jira request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_id_pattern() -> String {
    crate::keys::DEFAULT_KEY_PATTERN.to_string()
}

fn default_output() -> Utf8PathBuf {
    Utf8PathBuf::from("transformed_jira_data.json")
}

const fn default_api_version() -> u8 {
    2
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `jira-evidence.toml` in `base_dir` is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to '{output_path}'"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the key pattern does not compile or a value is out of range
    pub fn validate(&self) -> Result<()> {
        let _ = KeyPattern::new(&self.id_pattern)?;

        if !matches!(self.api_version, 2 | 3) {
            bail!("api_version must be 2 or 3, got {}", self.api_version);
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        if self.output.as_str().is_empty() {
            bail!("output must not be empty");
        }

        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_pattern: default_id_pattern(),
            output: default_output(),
            jira_url: None,
            jira_username: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
