//! List handler

use crate::BacklogHandler;
use crate::formatting;
use crate::problem::{self, ProblemItem};
use crate::validation;
use anyhow::Result;

impl BacklogHandler {
    /// Handles list operations - filters by status, applies search and sort, formats results.
    pub async fn handle_list(
        &self,
        status: Option<String>,
        search: Option<String>,
        sort: Option<String>,
        show_steps: bool,
    ) -> Result<String> {
        let status_filter = status
            .as_deref()
            .map(validation::parse_status)
            .transpose()?;
        let sort_order = sort
            .as_deref()
            .map(validation::parse_sort_order)
            .transpose()?;

        let snapshot = self.snapshot().await;
        let mut items: Vec<&ProblemItem> = match status_filter {
            Some(status) => problem::with_status(&snapshot, status),
            None => snapshot.iter().collect(),
        };

        if let Some(ref query) = search {
            items = problem::search(items, query);
        }

        if let Some(order) = sort_order {
            problem::sort_items(&mut items, order);
        }

        Ok(formatting::format_problems(&items, show_steps))
    }

    /// Handles the summary command - counts per list.
    pub async fn handle_summary(&self) -> Result<String> {
        let summary = self.store.lock().await.summary();
        Ok(formatting::format_summary(&summary))
    }
}
