//! Revision display formatting
//!
//! Tables for revision listings, a detail view and a plain-text diff.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Revision;

/// One row of a revision listing
#[derive(Tabled)]
struct RevisionRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "When")]
    created_at: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Row")]
    row: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Changed")]
    changed: String,
}

impl From<&Revision> for RevisionRow {
    fn from(revision: &Revision) -> Self {
        Self {
            id: revision.id(),
            created_at: revision.created_at().format("%Y-%m-%d %H:%M:%S").to_string(),
            action: revision.action().to_string(),
            row: format!("{}#{}", revision.table_name(), revision.row_id()),
            user: revision.user().unwrap_or("-").to_string(),
            changed: truncate(&revision.updated().join(", "), 40),
        }
    }
}

/// Format a list of revisions as a table
pub fn format_revision_list(revisions: &[Revision]) -> String {
    if revisions.is_empty() {
        return "No revisions found.\n".to_string();
    }

    let rows: Vec<RevisionRow> = revisions.iter().map(RevisionRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!("{}\n", table)
}

/// Format revision details for display
pub fn format_revision_details(revision: &Revision) -> String {
    let mut output = String::new();

    output.push_str(&format!("Revision:    {}\n", revision.id()));
    output.push_str(&format!("Action:      {}\n", revision.action()));
    output.push_str(&format!(
        "Row:         {} #{}\n",
        revision.table_name(),
        revision.row_id()
    ));
    output.push_str(&format!(
        "When:        {}\n",
        revision.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("User:        {}\n", revision.user().unwrap_or("-")));

    if let Some(ip) = revision.ip() {
        output.push_str(&format!("IP:          {}\n", ip));
    }
    if let Some(forwarded) = revision.ip_forwarded() {
        output.push_str(&format!("Forwarded:   {}\n", forwarded));
    }

    if !revision.old_values().is_empty() {
        output.push_str("\nOld:\n");
        for (key, value) in revision.old_values() {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    if !revision.new_values().is_empty() {
        output.push_str("\nNew:\n");
        for (key, value) in revision.new_values() {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    output
}

/// Plain-text diff, one `key: old -> new` line per changed field
pub fn format_revision_diff(revision: &Revision) -> String {
    let diff = revision.diff();
    if diff.is_empty() {
        return "No changes.\n".to_string();
    }

    let mut output = String::new();
    for (key, change) in diff {
        output.push_str(&format!(
            "{}: {} -> {}\n",
            key,
            change.old.as_deref().unwrap_or("(none)"),
            change.new.as_deref().unwrap_or("(none)")
        ));
    }
    output
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, NewRevision, RevisionData};

    fn data(pairs: &[(&str, &str)]) -> RevisionData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn revision() -> Revision {
        NewRevision::new(
            Action::Updated,
            "posts",
            1,
            data(&[("title", "Old"), ("body", "Same")]),
            data(&[("title", "New"), ("body", "Same"), ("tag", "rust")]),
        )
        .by(Some("john".into()))
        .into_revision(5)
    }

    #[test]
    fn test_list_table() {
        let output = format_revision_list(&[revision()]);
        assert!(output.contains("ID"));
        assert!(output.contains("posts#1"));
        assert!(output.contains("john"));
        assert!(output.contains("tag, title"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_revision_list(&[]), "No revisions found.\n");
    }

    #[test]
    fn test_details() {
        let output = format_revision_details(&revision());
        assert!(output.contains("Revision:    5"));
        assert!(output.contains("Action:      updated"));
        assert!(output.contains("  title: Old"));
        assert!(!output.contains("IP:"));
    }

    #[test]
    fn test_text_diff() {
        assert_eq!(
            format_revision_diff(&revision()),
            "tag: (none) -> rust\ntitle: Old -> New\n"
        );

        let deleted = NewRevision::new(Action::Deleted, "posts", 1, RevisionData::new(), RevisionData::new())
            .into_revision(6);
        assert_eq!(format_revision_diff(&deleted), "No changes.\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 40), "short");
        assert_eq!(truncate(&"x".repeat(50), 10), "xxxxxxx...");
    }
}
