//! Shared helpers for the test suites.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-writer subscriber when `PHERO_LOG` or `RUST_LOG` is set.
///
/// `PHERO_LOG` takes precedence. Safe to call from every test.
pub(crate) fn init_tracing() {
    INIT.call_once(|| {
        let filter = match std::env::var("PHERO_LOG") {
            Ok(val) => EnvFilter::builder().parse_lossy(val),
            Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            Err(_) => return,
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
