//! Derived views over a problem collection
//!
//! All of these are pure functions over a slice. The status filters keep the
//! relative order of the underlying collection; sorting is a separate step.

use super::problem_item::{ProblemItem, ProblemStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Items with the given status, in collection order
pub fn with_status(items: &[ProblemItem], status: ProblemStatus) -> Vec<&ProblemItem> {
    items.iter().filter(|i| i.status == status).collect()
}

pub fn backlog(items: &[ProblemItem]) -> Vec<&ProblemItem> {
    with_status(items, ProblemStatus::Backlog)
}

pub fn active(items: &[ProblemItem]) -> Vec<&ProblemItem> {
    with_status(items, ProblemStatus::Active)
}

pub fn completed(items: &[ProblemItem]) -> Vec<&ProblemItem> {
    with_status(items, ProblemStatus::Completed)
}

/// Keep items whose problem text contains `query`, ignoring case
///
/// An empty query keeps everything.
pub fn search<'a>(items: Vec<&'a ProblemItem>, query: &str) -> Vec<&'a ProblemItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|i| i.problem.to_lowercase().contains(&query))
        .collect()
}

/// Display order for a list of problems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently captured first
    #[default]
    Newest,
    /// Oldest captured first
    Oldest,
    /// By problem text, A to Z
    Alphabetical,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "alphabetical" | "az" => Ok(SortOrder::Alphabetical),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid options are: newest, oldest, alphabetical",
                s
            )),
        }
    }
}

/// Sort items for display. The sort is stable, so ties keep collection order.
pub fn sort_items(items: &mut [&ProblemItem], order: SortOrder) {
    match order {
        SortOrder::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Alphabetical => items.sort_by(|a, b| a.problem.cmp(&b.problem)),
    }
}

/// Number of problems in each list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub backlog: usize,
    pub active: usize,
    pub completed: usize,
}

impl Summary {
    pub fn of(items: &[ProblemItem]) -> Self {
        items.iter().fold(Summary::default(), |mut acc, item| {
            match item.status {
                ProblemStatus::Backlog => acc.backlog += 1,
                ProblemStatus::Active => acc.active += 1,
                ProblemStatus::Completed => acc.completed += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.backlog + self.active + self.completed
    }
}
