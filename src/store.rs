//! In-memory problem collection mirrored to storage
//!
//! `ProblemStore` owns the canonical collection. Every mutation builds the next
//! collection, swaps it in, persists the whole thing and publishes the new
//! snapshot to subscribers. Operations never fail: an unknown id is a no-op
//! reported as `false`, and write failures are logged.

use crate::migration::repair_items;
use crate::problem::{self, ProblemId, ProblemItem, ProblemStatus, StepPolicy, Summary};
use crate::storage::{Storage, encode_items};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

/// Source of "now" for timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Shared, immutable view of the collection at one point in time
pub type Snapshot = Arc<Vec<ProblemItem>>;

enum WriteCommand {
    Write(Vec<u8>),
    Flush(oneshot::Sender<()>),
}

/// Single task applying writes in the order they were queued
struct BackgroundWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl BackgroundWriter {
    fn spawn(storage: Storage, handle: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteCommand>();
        handle.spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Write(bytes) => {
                        let storage = storage.clone();
                        let result =
                            tokio::task::spawn_blocking(move || storage.write_blob(&bytes)).await;
                        match result {
                            Ok(Ok(())) => tracing::debug!("background write finished"),
                            Ok(Err(e)) => tracing::warn!("background write failed: {:#}", e),
                            Err(e) => tracing::warn!("background write task failed: {}", e),
                        }
                    }
                    WriteCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { tx }
    }
}

enum Writer {
    Immediate,
    Background(BackgroundWriter),
}

/// Repository over the problem collection
pub struct ProblemStore {
    items: Snapshot,
    storage: Storage,
    writer: Writer,
    policy: StepPolicy,
    clock: Clock,
    changes: watch::Sender<Snapshot>,
}

impl ProblemStore {
    /// Open a store over `storage`, loading whatever it holds
    ///
    /// Missing or unreadable data starts the store empty.
    pub fn open(storage: Storage) -> Self {
        let items: Snapshot = Arc::new(storage.load_all());
        tracing::debug!(count = items.len(), key = storage.key(), "loaded problem items");
        let (changes, _) = watch::channel(items.clone());
        Self {
            items,
            storage,
            writer: Writer::Immediate,
            policy: StepPolicy::default(),
            clock: Arc::new(problem::now),
            changes,
        }
    }

    /// Use `policy` when steps are appended
    pub fn with_policy(mut self, policy: StepPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Take timestamps from `clock` instead of the system time
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Hand writes to a background task on the current tokio runtime
    ///
    /// Outside a runtime, writes stay immediate.
    pub fn with_background_writes(mut self) -> Self {
        match Handle::try_current() {
            Ok(handle) => {
                self.writer = Writer::Background(BackgroundWriter::spawn(
                    self.storage.clone(),
                    &handle,
                ));
            }
            Err(_) => {
                tracing::warn!("no tokio runtime available, writing synchronously");
            }
        }
        self
    }

    pub fn policy(&self) -> StepPolicy {
        self.policy
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The whole collection in insertion order
    pub fn items(&self) -> &[ProblemItem] {
        &self.items
    }

    /// The current collection as a shareable snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProblemId) -> Option<&ProblemItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn backlog(&self) -> Vec<&ProblemItem> {
        problem::backlog(&self.items)
    }

    pub fn active(&self) -> Vec<&ProblemItem> {
        problem::active(&self.items)
    }

    pub fn completed(&self) -> Vec<&ProblemItem> {
        problem::completed(&self.items)
    }

    pub fn with_status(&self, status: ProblemStatus) -> Vec<&ProblemItem> {
        problem::with_status(&self.items, status)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.items)
    }

    /// Receive a new snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.changes.subscribe()
    }

    /// File a problem for later
    pub fn add(&mut self, problem: impl Into<String>) -> ProblemItem {
        let item = ProblemItem::new(problem, (self.clock)());
        self.insert(item)
    }

    /// Start on a problem now, with its first step
    pub fn add_with_first_step(
        &mut self,
        problem: impl Into<String>,
        first_step: impl Into<String>,
    ) -> ProblemItem {
        let item = ProblemItem::start(problem, first_step, (self.clock)());
        self.insert(item)
    }

    fn insert(&mut self, mut item: ProblemItem) -> ProblemItem {
        while self.get(item.id).is_some() {
            item.id = Uuid::new_v4();
        }
        tracing::debug!(id = %item.id, status = %item.status, "adding problem");

        let mut next = self.items.as_ref().clone();
        next.push(item.clone());
        self.commit(next);
        item
    }

    /// Delete a problem and its steps
    ///
    /// # Returns
    /// `false` if no problem has this id; the collection is then unchanged
    pub fn remove(&mut self, id: ProblemId) -> bool {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "remove: no such problem");
            return false;
        };
        tracing::debug!(%id, "removing problem");

        let mut next = self.items.as_ref().clone();
        next.remove(index);
        self.commit(next);
        true
    }

    /// Move a problem to another list
    ///
    /// Completing marks every step done.
    pub fn set_status(&mut self, id: ProblemId, status: ProblemStatus) -> bool {
        self.update(id, |item, at| {
            tracing::debug!(%id, from = %item.status, to = %status, "changing status");
            item.set_status(status, at);
            true
        })
    }

    /// Append a step to a problem, following the store's step policy
    pub fn append_task(&mut self, id: ProblemId, text: impl Into<String>) -> bool {
        let policy = self.policy;
        let text = text.into();
        self.update(id, |item, at| {
            item.append_task(text, policy, at);
            true
        })
    }

    /// Flip the done flag of a problem's last step
    ///
    /// # Returns
    /// `false` if the problem does not exist or has no steps
    pub fn toggle_last_task_done(&mut self, id: ProblemId) -> bool {
        self.update(id, |item, at| item.toggle_last_task_done(at))
    }

    /// Read the collection currently held by storage
    pub fn load_all(&self) -> Vec<ProblemItem> {
        self.storage.load_all()
    }

    /// Replace the whole collection and persist it
    pub fn save_all(&mut self, items: Vec<ProblemItem>) {
        let mut next = items;
        repair_items(&mut next);
        self.commit(next);
    }

    /// Re-read storage into memory, dropping unsaved state
    pub fn reload(&mut self) {
        self.items = Arc::new(self.storage.load_all());
        self.changes.send_replace(self.items.clone());
    }

    /// Wait until every queued background write has been applied
    pub async fn flush(&self) {
        if let Writer::Background(writer) = &self.writer {
            let (done_tx, done_rx) = oneshot::channel();
            if writer.tx.send(WriteCommand::Flush(done_tx)).is_ok() {
                let _ = done_rx.await;
            }
        }
    }

    fn position(&self, id: ProblemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    fn update<F>(&mut self, id: ProblemId, f: F) -> bool
    where
        F: FnOnce(&mut ProblemItem, DateTime<Utc>) -> bool,
    {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "update: no such problem");
            return false;
        };

        let mut next = self.items.as_ref().clone();
        if !f(&mut next[index], (self.clock)()) {
            return false;
        }
        self.commit(next);
        true
    }

    fn commit(&mut self, next: Vec<ProblemItem>) {
        self.items = Arc::new(next);
        self.persist();
        self.changes.send_replace(self.items.clone());
    }

    fn persist(&self) {
        let bytes = match encode_items(&self.items) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("not saving: {:#}", e);
                return;
            }
        };

        let bytes = match &self.writer {
            Writer::Immediate => bytes,
            Writer::Background(writer) => match writer.tx.send(WriteCommand::Write(bytes)) {
                Ok(()) => return,
                Err(mpsc::error::SendError(WriteCommand::Write(bytes))) => {
                    tracing::warn!("background writer stopped, writing synchronously");
                    bytes
                }
                Err(_) => return,
            },
        };

        if let Err(e) = self.storage.write_blob(&bytes) {
            tracing::warn!(key = self.storage.key(), "failed to save problem items: {:#}", e);
        }
    }
}
