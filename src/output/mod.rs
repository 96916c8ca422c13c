// src/output/mod.rs

//! Output multiplexing.
//!
//! Every command writes into one shared destination. Named commands have each
//! line decorated with `<label> | `; anonymous commands pass through raw.
//!
//! - [`prefix`] holds the pure line-prefixing transform.
//! - [`sink`] holds the lock-serialised shared destination.
//! - [`palette`] holds the label colours handed out to named commands.

pub mod palette;
pub mod prefix;
pub mod sink;

pub use palette::{Label, PALETTE};
pub use prefix::{prefix_lines, write_prefixed};
pub use sink::{OutputSink, SharedBuffer};
