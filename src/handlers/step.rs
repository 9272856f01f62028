//! Step handlers: append a step, toggle the last one

use crate::BacklogHandler;
use crate::formatting::short_id;
use crate::problem::StepPolicy;
use crate::validation;
use anyhow::{Result, bail};

impl BacklogHandler {
    /// Append the next step to a problem.
    pub async fn handle_add_step(&self, id: String, text: String) -> Result<String> {
        let text = validation::require_text("Step", &text)?;

        let mut store = self.store.lock().await;
        let id = validation::resolve_id(store.items(), &id)?;
        if !store.append_task(id, text.clone()) {
            drop(store);
            bail!("Problem '{}' not found", id);
        }

        let mut response = format!("Added step to {}: {}", short_id(&id), text);
        if store.policy() == StepPolicy::AdvanceOnAppend
            && let Some(item) = store.get(id)
            && item.tasks.len() > 1
        {
            response.push_str("\nPrevious step marked done");
        }
        Ok(response)
    }

    /// Flip the done flag of a problem's last step.
    pub async fn handle_toggle_step(&self, id: String) -> Result<String> {
        let mut store = self.store.lock().await;
        let id = validation::resolve_id(store.items(), &id)?;
        match store.get(id).map(|item| item.tasks.len()) {
            None => {
                drop(store);
                bail!("Problem '{}' not found", id);
            }
            Some(0) => {
                drop(store);
                bail!("Problem {} has no steps", short_id(&id));
            }
            Some(_) => {}
        }

        store.toggle_last_task_done(id);
        let Some(task) = store.get(id).and_then(|item| item.current_task()) else {
            bail!("Problem '{}' not found", id);
        };
        Ok(format!(
            "Step '{}' marked {}",
            task.text,
            if task.is_done { "done" } else { "not done" }
        ))
    }
}
