//! Jira access and interpretation of Jira data
//!
//! The client fetches issues over the REST API. The remaining modules turn the loosely
//! shaped parts of an issue (rich-text descriptions, timestamps, changelogs) into plain values.

mod client;
mod description;
pub mod model;
mod timestamp;
mod transitions;

pub use client::{Client, Credentials, IssueSource};
pub use description::{ContentNode, Description, flatten_description, render_generic};
pub use model::Issue;
pub use timestamp::{JIRA_TIME_FORMAT, Timestamp, format_instant, normalize_timestamp};
pub use transitions::extract_transitions;
