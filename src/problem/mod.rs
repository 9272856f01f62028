//! Problem domain models
//!
//! This module contains the data records the store keeps and the rules they follow.
//! It is split into submodules:
//! - `problem_item`: the top-level problem record and its status lifecycle
//! - `task_item`: a single step belonging to a problem
//! - `queries`: derived views (status filters, search, sort, summary counts)
//! - `timestamp`: timestamp encoding for the persisted blob

mod problem_item;
mod queries;
mod task_item;
pub(crate) mod timestamp;

// Re-export all public types
pub use problem_item::{ProblemId, ProblemItem, ProblemStatus, StepPolicy, now};
pub use queries::{SortOrder, Summary, active, backlog, completed, search, sort_items, with_status};
pub use task_item::TaskItem;
