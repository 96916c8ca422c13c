// src/group/mod.rs

//! Group scheduling.
//!
//! - [`cancel`] provides the cooperative cancellation scope shared by a
//!   group's workers.
//! - [`worker`] holds the per-command loop: poll dependencies, then run.
//! - [`scheduler`] owns the set of commands, launches one worker per command
//!   and fans out interrupts when anything fails or the caller cancels.

pub mod cancel;
pub mod scheduler;
pub mod worker;

pub use cancel::CancelToken;
pub use scheduler::{DEFAULT_POLL_INTERVAL, Group};
