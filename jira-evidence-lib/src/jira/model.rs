//! The parts of a Jira issue response that evidence is built from.
//!
//! Every associated entity is optional. Jira omits or nulls fields depending on the
//! project configuration and on the permissions of the calling user.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An issue as returned by `GET /rest/api/{version}/issue/{key}?expand=changelog`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    pub fields: Option<IssueFields>,
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    pub status: Option<Named>,

    /// A plain string (API v2) or an Atlassian Document Format tree (API v3)
    #[serde(default)]
    pub description: Value,

    #[serde(rename = "issuetype")]
    pub issue_type: Option<Named>,

    pub project: Option<Project>,

    #[serde(default)]
    pub created: Value,

    #[serde(default)]
    pub updated: Value,

    pub assignee: Option<User>,
    pub reporter: Option<User>,
    pub priority: Option<Named>,
}

/// Status, issue type and priority all carry a display name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(rename = "displayName", default, deserialize_with = "null_as_default")]
    pub display_name: String,

    #[serde(rename = "emailAddress", default, deserialize_with = "null_as_default")]
    pub email_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub histories: Vec<History>,
}

/// One edit session on an issue, possibly touching several fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct History {
    pub author: Option<User>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,

    #[serde(rename = "fromString")]
    pub from_status: Option<String>,

    #[serde(rename = "toString")]
    pub to_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_deserialize_full() {
        let json = r#"{
            "key": "EV-1",
            "fields": {
                "status": { "name": "QA in Progress", "id": "10001" },
                "description": "plain text",
                "issuetype": { "name": "Task" },
                "project": { "key": "EV", "name": "Evidence" },
                "created": "2020-01-01T12:11:56.063+0530",
                "updated": "2020-01-01T12:12:01.876+0530",
                "assignee": { "displayName": "Ada", "emailAddress": "ada@example.com" },
                "reporter": { "displayName": "Bob" },
                "priority": { "name": "Medium" }
            },
            "changelog": {
                "histories": [
                    {
                        "author": { "displayName": "Ada", "emailAddress": "ada@example.com" },
                        "created": "2020-07-28T16:39:54.620+0530",
                        "items": [
                            { "field": "status", "fromString": "To Do", "toString": "In Progress" }
                        ]
                    }
                ]
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, "EV-1");

        let fields = issue.fields.unwrap();
        assert_eq!(fields.status.unwrap().name, "QA in Progress");
        assert_eq!(fields.issue_type.unwrap().name, "Task");
        assert_eq!(fields.project.unwrap().key, "EV");
        assert_eq!(fields.assignee.unwrap().email_address, "ada@example.com");
        assert_eq!(fields.reporter.unwrap().email_address, "");
        assert_eq!(fields.description, Value::String("plain text".into()));

        let histories = issue.changelog.unwrap().histories;
        assert_eq!(histories.len(), 1);
        assert_eq!(histories[0].items[0].to_status.as_deref(), Some("In Progress"));
    }

    #[test]
    fn test_issue_deserialize_nulls() {
        let json = r#"{
            "key": "EV-2",
            "fields": {
                "status": null,
                "description": null,
                "assignee": null,
                "priority": null
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        let fields = issue.fields.unwrap();
        assert!(fields.status.is_none());
        assert!(fields.assignee.is_none());
        assert!(fields.description.is_null());
        assert!(fields.created.is_null());
        assert!(issue.changelog.is_none());
    }

    #[test]
    fn test_issue_deserialize_nested_nulls() {
        let json = r#"{
            "key": null,
            "fields": {
                "status": { "name": null },
                "project": { "key": null },
                "reporter": { "displayName": "Bob", "emailAddress": null },
                "assignee": { "displayName": null, "emailAddress": null }
            },
            "changelog": {
                "histories": [
                    { "author": { "displayName": "Ada", "emailAddress": null }, "created": null, "items": null },
                    { "author": null, "created": "2020-07-28T16:39:54.620+0530", "items": [
                        { "field": null, "fromString": null, "toString": null },
                        { "field": "status", "fromString": "To Do", "toString": "Done" }
                    ]}
                ]
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, "");

        let fields = issue.fields.unwrap();
        assert_eq!(fields.status.unwrap().name, "");
        assert_eq!(fields.project.unwrap().key, "");
        assert_eq!(fields.reporter.unwrap().email_address, "");
        assert_eq!(fields.assignee.unwrap().display_name, "");

        let histories = issue.changelog.unwrap().histories;
        assert_eq!(histories[0].author.as_ref().unwrap().email_address, "");
        assert_eq!(histories[0].created, "");
        assert!(histories[0].items.is_empty());
        assert_eq!(histories[1].items[0].field, "");
        assert!(histories[1].items[0].from_status.is_none());
    }

    #[test]
    fn test_changelog_with_null_histories() {
        let issue: Issue = serde_json::from_str(r#"{ "key": "EV-4", "fields": {}, "changelog": { "histories": null } }"#).unwrap();
        assert!(issue.changelog.unwrap().histories.is_empty());
    }

    #[test]
    fn test_issue_deserialize_without_fields() {
        let issue: Issue = serde_json::from_str(r#"{ "key": "EV-3" }"#).unwrap();
        assert!(issue.fields.is_none());
    }
}
