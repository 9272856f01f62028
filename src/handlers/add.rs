//! Add handler: file a problem for later or start on it now

use crate::BacklogHandler;
use crate::formatting::short_id;
use crate::validation;
use anyhow::Result;

impl BacklogHandler {
    /// **Capture**: record a problem.
    /// Without a step it is filed to the backlog; with a step it becomes active
    /// with that step as its first task.
    pub async fn handle_add(&self, problem: String, first_step: Option<String>) -> Result<String> {
        let problem = validation::require_text("Problem", &problem)?;
        let first_step = first_step
            .map(|step| validation::require_text("Step", &step))
            .transpose()?;

        let mut store = self.store.lock().await;
        let response = match first_step {
            Some(step) => {
                let item = store.add_with_first_step(problem, step.clone());
                format!(
                    "Problem started with ID: {} (first step: {})",
                    short_id(&item.id),
                    step
                )
            }
            None => {
                let item = store.add(problem);
                format!("Problem filed to backlog with ID: {}", short_id(&item.id))
            }
        };
        Ok(response)
    }
}
