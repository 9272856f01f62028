//! Mind Backlog Library
//!
//! Capture a problem, decide whether to start on it now or file it for later,
//! and track it through three lists: backlog, active and completed.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Command Layer**: `BacklogHandler` and `handlers` - validate user input and render output
//! - **Domain Layer**: `problem` module - problem and step records, status lifecycle, derived views
//! - **Persistence Layer**: `store` and `storage` modules - in-memory collection mirrored to a
//!   local key-value store as one JSON blob
//!
//! # Example
//!
//! ```no_run
//! use mind_backlog::{ProblemStatus, ProblemStore, Storage};
//!
//! let mut store = ProblemStore::open(Storage::in_dir("data", "currtenProblemItems"));
//! let item = store.add_with_first_step("Write report", "Draft outline");
//! store.set_status(item.id, ProblemStatus::Completed);
//! assert_eq!(store.completed().len(), 1);
//! ```

pub mod config;
pub mod formatting;
pub mod handlers;
pub mod migration;
pub mod problem;
pub mod storage;
pub mod store;
pub mod validation;

use tokio::sync::Mutex;

// Re-export commonly used types
pub use config::Config;
pub use problem::{ProblemId, ProblemItem, ProblemStatus, SortOrder, StepPolicy, Summary, TaskItem};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Storage};
pub use store::{Clock, ProblemStore, Snapshot};

/// Command handler owning the problem store
///
/// Each command validates its input, runs one store operation and returns the
/// text to show. See the `handlers` module for the individual commands.
pub struct BacklogHandler {
    pub(crate) store: Mutex<ProblemStore>,
}

impl BacklogHandler {
    /// Create a handler from a configuration
    ///
    /// Background writes need a running tokio runtime; without one they are
    /// performed inline.
    pub fn new(config: &Config) -> Self {
        let storage = Storage::in_dir(&config.data_dir, config.storage_key.clone());
        let mut store = ProblemStore::open(storage).with_policy(config.step_policy);
        if config.background_writes {
            store = store.with_background_writes();
        }
        Self::with_store(store)
    }

    /// Create a handler around an existing store
    pub fn with_store(store: ProblemStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// The current collection
    pub async fn snapshot(&self) -> Snapshot {
        self.store.lock().await.snapshot()
    }

    /// Wait for pending background writes
    pub async fn flush(&self) {
        self.store.lock().await.flush().await;
    }
}
