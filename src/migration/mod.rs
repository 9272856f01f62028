//! Repair pass for collections read back from storage
//!
//! The persisted blob carries no schema version, so anything that decodes is
//! accepted and then brought back in line with the model's invariants before
//! the store uses it:
//!
//! - later items that reuse an earlier item's id get a fresh id
//! - `updated_at` is raised to `created_at` when it is earlier
//! - `completed_at` is present exactly on completed items
//!
//! Problem and step text is kept byte for byte.

mod repair;

pub use repair::{RepairReport, reassign_duplicate_ids, repair_items, repair_timestamps};
