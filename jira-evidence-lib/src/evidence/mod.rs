//! Normalized issue evidence
//!
//! Each requested issue key becomes exactly one [`IssueRecord`], whether or not the issue
//! could be fetched. The records are gathered in a [`ResultSet`], which is what gets written
//! to the evidence file.

mod issue_record;
mod result_set;

pub use issue_record::{ERROR_STATUS, ERROR_TYPE, FALLBACK_ERROR_MESSAGE, IssueRecord, Transition};
pub use result_set::ResultSet;
