use crate::Result;
use crate::jira::model::{IssueFields, Named};
use crate::jira::{Issue, extract_transitions, flatten_description, normalize_timestamp};
use serde::{Deserialize, Serialize};

/// Status and type reported for issues that could not be retrieved
pub const ERROR_STATUS: &str = "Error";
pub const ERROR_TYPE: &str = "Error";

/// Description used when a fetch failed without saying why
pub const FALLBACK_ERROR_MESSAGE: &str = "Error: Could not retrieve issue";

/// A change of an issue's workflow status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_status: String,
    pub to_status: String,
    pub author: String,
    #[serde(rename = "author_user_name")]
    pub author_email: String,
    pub transition_time: String,
}

/// The evidence recorded for one issue key
///
/// Records for issues that could not be fetched have the same shape, with `status` and
/// `type` set to `"Error"` and the reason in `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub status: String,
    pub description: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub project: String,
    pub created: String,
    pub updated: String,
    pub assignee: Option<String>,
    pub reporter: String,
    pub priority: String,
    pub transitions: Vec<Transition>,
}

impl IssueRecord {
    /// Build the record for the outcome of fetching `key`.
    #[must_use]
    pub fn assemble(key: &str, outcome: &Result<Issue>) -> Self {
        match outcome {
            Ok(issue) => Self::from_issue(key, issue).unwrap_or_else(|| Self::error(key, None)),
            Err(e) => Self::error(key, Some(&format!("{e:#}"))),
        }
    }

    /// Build the record for a fetched issue. Returns `None` if the issue has no fields.
    #[must_use]
    pub fn from_issue(key: &str, issue: &Issue) -> Option<Self> {
        let fields = issue.fields.as_ref()?;
        let key = if issue.key.is_empty() { key } else { issue.key.as_str() };

        Some(Self {
            key: key.to_string(),
            status: name_of(fields.status.as_ref()),
            description: flatten_description(&fields.description),
            issue_type: name_of(fields.issue_type.as_ref()),
            project: project_key(fields),
            created: normalize_timestamp(&fields.created),
            updated: normalize_timestamp(&fields.updated),
            assignee: fields.assignee.as_ref().map(|user| user.display_name.clone()),
            reporter: fields.reporter.as_ref().map(|user| user.display_name.clone()).unwrap_or_default(),
            priority: name_of(fields.priority.as_ref()),
            transitions: extract_transitions(issue.changelog.as_ref()),
        })
    }

    /// Build the placeholder record for an issue that could not be retrieved.
    #[must_use]
    pub fn error(key: &str, message: Option<&str>) -> Self {
        let description = message.map_or_else(|| FALLBACK_ERROR_MESSAGE.to_string(), |m| format!("Error: {m}"));

        Self {
            key: key.to_string(),
            status: ERROR_STATUS.to_string(),
            description,
            issue_type: ERROR_TYPE.to_string(),
            project: String::new(),
            created: String::new(),
            updated: String::new(),
            assignee: None,
            reporter: String::new(),
            priority: String::new(),
            transitions: Vec::new(),
        }
    }

    /// Whether this record stands in for an issue that could not be retrieved.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == ERROR_STATUS && self.issue_type == ERROR_TYPE
    }
}

fn name_of(named: Option<&Named>) -> String {
    named.map(|n| n.name.clone()).unwrap_or_default()
}

fn project_key(fields: &IssueFields) -> String {
    fields.project.as_ref().map(|p| p.key.clone()).unwrap_or_default()
}
