//! Tracing setup for tests
//!
//! Honors `RUST_LOG`; defaults to `warn` so rejected operations show up in
//! failing test output.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING: OnceCell<()> = OnceCell::new();

/// Installs a test-writer subscriber once per test binary
pub fn init_test_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
