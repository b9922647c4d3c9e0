//! Jira REST client
//!
//! Minimal client for fetching a single issue together with its changelog.

use super::model::Issue;
use crate::Result;
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use ohno::{IntoAppError, app_err, bail};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

const LOG_TARGET: &str = "      jira";

/// Everything needed to talk to a Jira instance
#[derive(Clone)]
pub struct Credentials {
    pub url: Url,
    pub username: String,
    pub token: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Something that can look up issues by key
pub trait IssueSource {
    fn fetch_issue(&self, key: &str) -> impl Future<Output = Result<Issue>> + Send;
}

#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    credentials: Credentials,
    api_version: u8,
}

impl Client {
    /// Create a client for the Jira instance at `credentials.url`
    pub fn new(credentials: Credentials, api_version: u8, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jira-evidence/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            credentials,
            api_version,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.credentials.url
    }

    /// The URL of an issue, with its changelog expanded
    pub fn issue_url(&self, key: &str) -> Result<Url> {
        let mut url = self.credentials.url.clone();
        let version = self.api_version.to_string();

        let _ = url
            .path_segments_mut()
            .map_err(|()| app_err!("Jira URL '{}' cannot be used as a base URL", self.credentials.url))?
            .pop_if_empty()
            .extend(["rest", "api", version.as_str(), "issue", key]);

        let _ = url.query_pairs_mut().clear().append_pair("expand", "changelog");

        Ok(url)
    }

    /// Fetch one issue with its changelog.
    ///
    /// # Errors
    ///
    /// Fails on network errors, timeouts, non-success HTTP statuses, and bodies that are not an issue.
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        let url = self.issue_url(key)?;
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .basic_auth(&self.credentials.username, Some(&self.credentials.token))
            .send()
            .await
            .into_app_err_with(|| format!("requesting issue '{key}' from Jira"))?;

        let status = resp.status();
        match status {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED => bail!("Jira rejected the configured credentials (HTTP 401)"),
            StatusCode::FORBIDDEN => bail!("the configured Jira user may not view issue '{key}' (HTTP 403)"),
            StatusCode::NOT_FOUND => bail!("issue '{key}' does not exist (HTTP 404)"),
            _ => bail!("Jira answered HTTP {status} when requesting issue '{key}'"),
        }

        resp.json::<Issue>()
            .await
            .into_app_err_with(|| format!("decoding Jira response for issue '{key}'"))
    }
}

impl IssueSource for Client {
    fn fetch_issue(&self, key: &str) -> impl Future<Output = Result<Issue>> + Send {
        self.get_issue(key)
    }
}
