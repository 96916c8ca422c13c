// src/config/mod.rs

//! Group configuration files.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading one file or a whole config directory.
//! - `validate.rs`: structural checks (names, command text, cycles).
//! - `build.rs`: turning a validated config into a runnable `Group`.

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use build::build_group;
pub use loader::{default_config_dir, load_and_validate, load_dir, load_from_path};
pub use model::{CommandConfig, GroupConfig, RawGroupConfig};
pub use validate::{RESERVED_NAMES, validate_groups};
