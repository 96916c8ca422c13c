pub mod builders;

use std::sync::Once;
use std::time::Duration;

use cmdgroup::exec::{CommandSpec, ProcessUnit};
use cmdgroup::group::Group;
use cmdgroup::output::{OutputSink, SharedBuffer};
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Poll interval for groups built in tests; short so suites stay quick.
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
///
/// Longer than the interrupt grace period, so a command that ignores
/// SIGINT shows up as a slow test rather than a timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Build a group whose units all write into one captured buffer.
pub fn captured_group(specs: impl IntoIterator<Item = CommandSpec>) -> (Group, SharedBuffer) {
    let (sink, buf) = OutputSink::buffer();
    let units: Vec<ProcessUnit> = specs
        .into_iter()
        .map(|spec| ProcessUnit::new(spec, sink.clone()).expect("valid command spec"))
        .collect();
    let group = Group::from_units(units)
        .expect("unique command names")
        .with_poll_interval(TEST_POLL_INTERVAL);
    (group, buf)
}
