//! Node-to-row projection.
//!
//! Projection never fails and never drops a node: every node becomes
//! exactly one row, and anything unreadable about its payload degrades
//! the note to an empty string while the node id survives untouched.

use serde_json::Value;

use crate::jobs::{Job, Node};
use crate::types::{Cell, Row};

/// Name of the payload field the note is read from.
pub const NOTES_FIELD: &str = "notes";

/// Extracts the note from a configuration payload.
///
/// The payload must parse as JSON and carry a string under
/// [`NOTES_FIELD`]; every other shape (malformed JSON, non-object,
/// absent key, non-string value) answers `None`.
///
/// # Examples
///
/// ```
/// use rowsource::jobs::extract_note;
///
/// assert_eq!(
///     extract_note(r#"{"notes":"check cabling"}"#),
///     Some("check cabling".to_string())
/// );
/// assert_eq!(extract_note("garbage"), None);
/// assert_eq!(extract_note("{}"), None);
/// assert_eq!(extract_note(r#"{"notes":7}"#), None);
/// assert_eq!(extract_note(r#"{"notes":null}"#), None);
/// ```
pub fn extract_note(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    value.get(NOTES_FIELD)?.as_str().map(str::to_string)
}

/// Projects one node to its output row: node id, then note.
///
/// The empty-string fallback for unreadable notes is applied here and
/// only here.
///
/// # Examples
///
/// ```
/// use rowsource::jobs::{project_node, Node};
///
/// let row = project_node(&Node::new("N2", "garbage"));
/// assert_eq!(row.cells[0].value, "N2");
/// assert_eq!(row.cells[1].value, "");
/// ```
pub fn project_node(node: &Node) -> Row {
    let note = extract_note(&node.configuration).unwrap_or_default();
    Row::new(vec![Cell::new(node.id.as_str()), Cell::new(note)])
}

/// Projects a resolved job (or none) to its output rows.
///
/// `None` yields no rows; otherwise one row per node, in node order.
pub fn project(job: Option<&Job>) -> Vec<Row> {
    match job {
        Some(job) => job.nodes().iter().map(project_node).collect(),
        None => Vec::new(),
    }
}
