//! Change status handler

use crate::BacklogHandler;
use crate::formatting::short_id;
use crate::validation;
use anyhow::{Result, bail};

impl BacklogHandler {
    /// **Triage**: move a problem between lists.
    /// backlog→active (start it) | active→completed (finish it, every step is marked done)
    /// | completed→active (reactivate) | any→backlog (defer).
    pub async fn handle_change_status(&self, id: String, new_status: String) -> Result<String> {
        let status = validation::parse_status(&new_status)?;

        let mut store = self.store.lock().await;
        let id = validation::resolve_id(store.items(), &id)?;
        let Some(old_status) = store.get(id).map(|item| item.status) else {
            drop(store);
            bail!("Problem '{}' not found", id);
        };

        store.set_status(id, status);
        Ok(format!(
            "Problem {} status changed: {} → {}",
            short_id(&id),
            old_status,
            status
        ))
    }
}
