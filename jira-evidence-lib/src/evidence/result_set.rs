use super::IssueRecord;
use crate::Result;
use crate::jira::{Issue, IssueSource};
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;

const LOG_TARGET: &str = "  evidence";

/// The evidence document: one record per requested key, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub tasks: Vec<IssueRecord>,
}

impl ResultSet {
    /// Assemble one record per `(key, outcome)` pair, keeping their order.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = (&'a str, Result<Issue>)>) -> Self {
        Self {
            tasks: outcomes
                .into_iter()
                .map(|(key, outcome)| IssueRecord::assemble(key, &outcome))
                .collect(),
        }
    }

    /// Fetch every key from `source`, one at a time and in order.
    ///
    /// A failed fetch never aborts the batch. It produces an error record and is reported
    /// through `on_failure` with the key and the reason.
    pub async fn collect<S, F>(source: &S, keys: &[String], mut on_failure: F) -> Self
    where
        S: IssueSource,
        F: FnMut(&str, &str),
    {
        let mut tasks = Vec::with_capacity(keys.len());

        for key in keys {
            log::info!(target: LOG_TARGET, "Fetching issue '{key}'");
            let outcome = source.fetch_issue(key).await;

            match &outcome {
                Err(e) => {
                    let reason = format!("{e:#}");
                    log::warn!(target: LOG_TARGET, "Could not fetch issue '{key}': {reason}");
                    on_failure(key, &reason);
                }
                Ok(issue) if issue.fields.is_none() => {
                    log::warn!(target: LOG_TARGET, "Jira returned no fields for issue '{key}'");
                    on_failure(key, "the response contained no issue fields");
                }
                Ok(_) => {}
            }

            tasks.push(IssueRecord::assemble(key, &outcome));
        }

        Self { tasks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of records standing in for issues that could not be retrieved
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.tasks.iter().filter(|r| r.is_error()).count()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).into_app_err("serializing evidence")
    }

    /// Write the evidence document to `path`, creating missing parent directories.
    pub fn write_to(&self, path: &Utf8Path) -> Result<()> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent).into_app_err_with(|| format!("could not create directory '{parent}'"))?;
        }

        fs::write(path, json).into_app_err_with(|| format!("writing evidence to '{path}'"))?;
        log::debug!(target: LOG_TARGET, "Wrote {} record(s) to '{path}'", self.tasks.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::model::{IssueFields, Named};
    use ohno::app_err;
    use proptest::prelude::*;

    fn found(key: &str, status: &str) -> Result<Issue> {
        Ok(Issue {
            key: key.to_string(),
            fields: Some(IssueFields {
                status: Some(Named { name: status.to_string() }),
                ..IssueFields::default()
            }),
            changelog: None,
        })
    }

    /// Succeeds for keys ending in an even digit
    struct EvenSource;

    impl IssueSource for EvenSource {
        async fn fetch_issue(&self, key: &str) -> Result<Issue> {
            if key.ends_with(['0', '2', '4', '6', '8']) {
                found(key, "Done")
            } else {
                Err(app_err!("issue '{key}' does not exist (HTTP 404)"))
            }
        }
    }

    #[tokio::test]
    async fn test_collect_keeps_order_and_reports_failures() {
        let keys: Vec<String> = ["EV-2", "EV-1", "EV-4", "EV-1"].iter().map(ToString::to_string).collect();
        let mut failures = Vec::new();

        let set = ResultSet::collect(&EvenSource, &keys, |key, reason| failures.push((key.to_string(), reason.to_string()))).await;

        let got: Vec<_> = set.tasks.iter().map(|r| (r.key.as_str(), r.status.as_str())).collect();
        assert_eq!(got, vec![("EV-2", "Done"), ("EV-1", "Error"), ("EV-4", "Done"), ("EV-1", "Error")]);

        assert_eq!(set.error_count(), 2);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].0, "EV-1");
        assert!(failures[0].1.contains("404"));
    }

    #[tokio::test]
    async fn test_collect_empty() {
        let set = ResultSet::collect(&EvenSource, &[], |_, _| panic!("no failures expected")).await;
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_outcomes() {
        let set = ResultSet::from_outcomes([("EV-1", found("EV-1", "Open")), ("EV-2", Err(app_err!("boom")))]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.tasks[0].status, "Open");
        assert!(set.tasks[1].is_error());
        assert!(set.tasks[1].transitions.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut record = IssueRecord::assemble("EV-1", &found("EV-1", "In Review"));
        record.assignee = Some("Ada".into());
        record.transitions.push(crate::evidence::Transition {
            from_status: "To Do".into(),
            to_status: "In Review".into(),
            author: "Ada".into(),
            author_email: "ada@example.com".into(),
            transition_time: "2020-07-28T16:39:54.620+0530".into(),
        });

        let set = ResultSet {
            tasks: vec![record, IssueRecord::error("EV-2", None)],
        };

        let json = set.to_json().unwrap();
        let back: ResultSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_json_is_pretty_with_tasks_root() {
        let set = ResultSet {
            tasks: vec![IssueRecord::error("EV-2", None)],
        };

        let json = set.to_json().unwrap();
        assert!(json.starts_with("{\n  \"tasks\": [\n    {\n      \"key\": \"EV-2\""));
    }

    #[test]
    fn test_write_to_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(temp_dir.path().join("nested/dir/evidence.json")).unwrap();

        let set = ResultSet {
            tasks: vec![IssueRecord::error("EV-2", None)],
        };
        set.write_to(&path).unwrap();

        let back: ResultSet = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, set);
    }

    proptest! {
        #[test]
        fn prop_one_record_per_key(keys in prop::collection::vec("[A-Z]{1,3}-[0-9]{1,3}", 0..20)) {
            let set = ResultSet::from_outcomes(keys.iter().enumerate().map(|(i, key)| {
                let outcome = if i % 3 == 0 { Err(app_err!("unreachable")) } else { found(key, "Open") };
                (key.as_str(), outcome)
            }));

            prop_assert_eq!(set.len(), keys.len());
            for (record, key) in set.tasks.iter().zip(&keys) {
                prop_assert_eq!(&record.key, key);
            }
            for record in set.tasks.iter().step_by(3) {
                prop_assert!(record.is_error());
                prop_assert!(record.transitions.is_empty());
            }
        }
    }
}
