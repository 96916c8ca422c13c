#![allow(dead_code)]

pub use cmdgroup_test_utils::builders::{CommandSpecBuilder, GroupConfigBuilder, command_config};
pub use cmdgroup_test_utils::{TEST_POLL_INTERVAL, captured_group, init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
