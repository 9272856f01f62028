use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step belonging to a problem
///
/// Steps are kept in insertion order on their owning [`ProblemItem`](super::ProblemItem)
/// and are only ever removed together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    /// Unique identifier, fixed at creation
    pub id: Uuid,
    /// What to do next. Empty text is accepted here; callers guard against it.
    #[serde(alias = "task")]
    pub text: String,
    /// Whether the step has been done
    pub is_done: bool,
}

impl TaskItem {
    /// Create a new, not yet done step
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_done: false,
        }
    }
}
