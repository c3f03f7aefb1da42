//! Test logging bootstrap shared by unit and integration test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Default filter: quiet, but keep the round service audible on failures.
const DEFAULT_FILTER: &str = "warn,shed_backend=warn";

/// Install a test-writer subscriber exactly once per process.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then [`DEFAULT_FILTER`].
/// Safe to call from every test; later calls are no-ops.
///
/// ```bash
/// TEST_LOG=shed_backend=debug cargo test -p shed-backend
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init()
            .ok();
    });
}
