// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`spec`] is the plain configuration for one command.
//! - [`unit`] runs that command as an OS process, intercepts its output and
//!   tracks whether it is ready for dependents.
//! - [`signal`] delivers interrupts to a command's whole process tree.

pub mod signal;
pub mod spec;
pub mod unit;

pub use spec::{CommandSpec, resolve_directory};
pub use unit::ProcessUnit;
