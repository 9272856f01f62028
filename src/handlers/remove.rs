//! Remove handler

use crate::BacklogHandler;
use crate::formatting::short_id;
use crate::validation;
use anyhow::Result;

impl BacklogHandler {
    /// Delete a problem with all of its steps.
    /// Removing an id that does not exist succeeds and changes nothing.
    pub async fn handle_remove(&self, id: String) -> Result<String> {
        let mut store = self.store.lock().await;
        let id = validation::resolve_id(store.items(), &id)?;
        if store.remove(id) {
            Ok(format!("Problem {} removed", short_id(&id)))
        } else {
            Ok(format!("Problem {} does not exist, nothing removed", short_id(&id)))
        }
    }
}
