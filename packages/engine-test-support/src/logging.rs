//! Test logging bootstrap shared by unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize structured logging for tests. Idempotent and race-safe.
///
/// The level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to
/// `warn` so test output stays quiet unless asked for. Output goes through
/// the test writer so cargo and nextest can capture it, timestamps are
/// dropped for stable output, and an already-installed subscriber is left
/// alone rather than panicked over.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
