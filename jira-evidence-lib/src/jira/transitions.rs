use super::model::Changelog;
use crate::evidence::Transition;

/// Changelog field name Jira uses for workflow status changes
const STATUS_FIELD: &str = "status";

/// Collect the status changes recorded in a changelog, oldest entry first.
///
/// Entries are kept in the order Jira reports them, and items within an entry in their
/// original order. A missing changelog yields no transitions.
#[must_use]
pub fn extract_transitions(changelog: Option<&Changelog>) -> Vec<Transition> {
    let Some(changelog) = changelog else {
        return Vec::new();
    };

    changelog
        .histories
        .iter()
        .flat_map(|history| {
            let (author, author_email) = history
                .author
                .as_ref()
                .map_or((String::new(), String::new()), |a| (a.display_name.clone(), a.email_address.clone()));

            history
                .items
                .iter()
                .filter(|item| item.field == STATUS_FIELD)
                .map(move |item| Transition {
                    from_status: item.from_status.clone().unwrap_or_default(),
                    to_status: item.to_status.clone().unwrap_or_default(),
                    author: author.clone(),
                    author_email: author_email.clone(),
                    transition_time: history.created.clone(),
                })
        })
        .collect()
}
