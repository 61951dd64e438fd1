//! One-time tracing setup for integration test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test-writer subscriber once per process.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `warn`. Calling it
/// again, or after another subscriber was installed, is harmless.
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
        tracing::debug!("test logging installed");
    });
}
