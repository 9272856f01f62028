//! Validation helpers for user input
//!
//! The store accepts any text and any id. These helpers are the caller-side
//! guards: trimming, rejecting empty text, parsing statuses and resolving the
//! short id prefixes shown in listings.

use crate::problem::{ProblemId, ProblemItem, ProblemStatus, SortOrder};
use anyhow::{Result, anyhow, bail};
use uuid::Uuid;

/// Parse a status name
pub fn parse_status(status_str: &str) -> Result<ProblemStatus> {
    status_str.trim().parse::<ProblemStatus>().map_err(|e| anyhow!(e))
}

/// Parse a sort order name
pub fn parse_sort_order(order_str: &str) -> Result<SortOrder> {
    order_str.trim().parse::<SortOrder>().map_err(|e| anyhow!(e))
}

/// Trim `text` and reject it if nothing is left
///
/// # Arguments
/// * `what` - Name of the field, used in the error message
/// * `text` - User-entered text
pub fn require_text(what: &str, text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("{} must not be empty", what);
    }
    Ok(trimmed.to_string())
}

/// Resolve a full id or a unique id prefix against `items`
///
/// A full UUID is returned as-is even when no item has it, so the caller
/// decides what a miss means. A prefix must match exactly one item.
pub fn resolve_id(items: &[ProblemItem], id_str: &str) -> Result<ProblemId> {
    let needle = id_str.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return Ok(id);
    }
    if needle.is_empty() {
        bail!("Problem ID must not be empty");
    }

    let mut matches = items
        .iter()
        .filter(|item| item.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item.id),
        (None, _) => bail!("No problem matches ID '{}'", id_str.trim()),
        (Some(_), Some(_)) => bail!(
            "ID '{}' is ambiguous. Use more characters of the ID.",
            id_str.trim()
        ),
    }
}
