//! Command handlers
//!
//! Each command is in a separate file and implemented on `BacklogHandler`.

pub mod add;
pub mod change_status;
pub mod list;
pub mod remove;
pub mod step;
