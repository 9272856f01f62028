use crate::problem::{ProblemItem, ProblemStatus};
use std::collections::HashSet;
use uuid::Uuid;

/// What the repair pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub duplicate_ids: usize,
    pub timestamps: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }
}

/// Give every item after the first one holding an id a fresh id
///
/// Task ids are handled the same way within each problem.
///
/// # Returns
///
/// Number of ids that were replaced
pub fn reassign_duplicate_ids(items: &mut [ProblemItem]) -> usize {
    let mut seen = HashSet::new();
    let mut replaced = 0;
    for item in items.iter_mut() {
        while !seen.insert(item.id) {
            item.id = Uuid::new_v4();
            replaced += 1;
        }

        let mut task_ids = HashSet::new();
        for task in item.tasks.iter_mut() {
            while !task_ids.insert(task.id) {
                task.id = Uuid::new_v4();
                replaced += 1;
            }
        }
    }
    replaced
}

/// Restore the timestamp invariants of a single item
///
/// # Returns
///
/// `true` if any timestamp changed
pub fn repair_timestamps(item: &mut ProblemItem) -> bool {
    let mut changed = false;
    if item.updated_at < item.created_at {
        item.updated_at = item.created_at;
        changed = true;
    }
    match (item.status, item.completed_at) {
        (ProblemStatus::Completed, None) => {
            item.completed_at = Some(item.updated_at);
            changed = true;
        }
        (ProblemStatus::Backlog | ProblemStatus::Active, Some(_)) => {
            item.completed_at = None;
            changed = true;
        }
        _ => {}
    }
    changed
}

/// Run every repair step over a freshly decoded collection
pub fn repair_items(items: &mut [ProblemItem]) -> RepairReport {
    let mut report = RepairReport {
        duplicate_ids: reassign_duplicate_ids(items),
        ..RepairReport::default()
    };
    for item in items.iter_mut() {
        if repair_timestamps(item) {
            report.timestamps += 1;
        }
    }
    report
}
