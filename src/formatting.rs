//! Formatting helpers for command output

use crate::problem::{ProblemId, ProblemItem, Summary};

/// Number of id characters shown in listings
pub const SHORT_ID_LEN: usize = 8;

/// Leading characters of an id, enough to pick it out in most collections
pub fn short_id(id: &ProblemId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Format problems into a display string
///
/// # Arguments
/// * `items` - Problems to format, in display order
/// * `show_steps` - Whether to list every step under each problem
pub fn format_problems(items: &[&ProblemItem], show_steps: bool) -> String {
    if items.is_empty() {
        return "No problems found".to_string();
    }

    let mut result = format!("Found {} problem(s):\n\n", items.len());
    for item in items {
        let (done, total) = item.progress();
        result.push_str(&format!(
            "- [{}] {} (status: {}, steps: {}/{})\n",
            short_id(&item.id),
            item.problem,
            item.status,
            done,
            total
        ));

        if show_steps {
            for task in &item.tasks {
                let mark = if task.is_done { "x" } else { " " };
                result.push_str(&format!("    [{}] {}\n", mark, task.text));
            }
        } else if let Some(task) = item.current_task()
            && !task.is_done
        {
            result.push_str(&format!("  Next step: {}\n", task.text));
        }

        result.push_str(&format!(
            "  Created: {}\n",
            item.created_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(completed_at) = item.completed_at {
            result.push_str(&format!(
                "  Completed: {}\n",
                completed_at.format("%Y-%m-%d %H:%M")
            ));
        }
    }

    result
}

/// Format list counts, with the singular/plural wording used by every list
pub fn format_summary(summary: &Summary) -> String {
    fn count(n: usize) -> String {
        format!("{} item{}", n, if n == 1 { "" } else { "s" })
    }

    format!(
        "Active: {} to tackle\nBacklog: {} stored\nCompleted: {} done\nTotal: {}",
        count(summary.active),
        count(summary.backlog),
        count(summary.completed),
        count(summary.total())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ProblemStatus, StepPolicy};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_empty() {
        assert_eq!(format_problems(&[], false), "No problems found");
    }

    #[test]
    fn test_format_shows_next_step() {
        let t0 = Utc.with_ymd_and_hms(2025, 10, 16, 9, 5, 0).unwrap();
        let item = ProblemItem::start("Write report", "Draft outline", t0);
        let output = format_problems(&[&item], false);

        assert!(output.starts_with("Found 1 problem(s):"));
        assert!(output.contains(&short_id(&item.id)));
        assert!(output.contains("Write report (status: active, steps: 0/1)"));
        assert!(output.contains("Next step: Draft outline"));
        assert!(output.contains("Created: 2025-10-16 09:05"));
    }

    #[test]
    fn test_format_with_steps() {
        let t0 = Utc.with_ymd_and_hms(2025, 10, 16, 9, 5, 0).unwrap();
        let mut item = ProblemItem::start("Garden", "Buy seeds", t0);
        item.append_task("Plant seeds", StepPolicy::AdvanceOnAppend, t0);
        item.set_status(ProblemStatus::Completed, t0);
        let output = format_problems(&[&item], true);

        assert!(output.contains("    [x] Buy seeds\n"));
        assert!(output.contains("    [x] Plant seeds\n"));
        assert!(output.contains("Completed: 2025-10-16 09:05"));
        assert!(!output.contains("Next step"));
    }

    #[test]
    fn test_format_summary_pluralizes() {
        let summary = Summary {
            backlog: 1,
            active: 0,
            completed: 2,
        };
        let output = format_summary(&summary);
        assert!(output.contains("Active: 0 items to tackle"));
        assert!(output.contains("Backlog: 1 item stored"));
        assert!(output.contains("Completed: 2 items done"));
        assert!(output.contains("Total: 3 items"));
    }
}
