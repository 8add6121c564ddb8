//! Test-only helpers shared by the ticktab crates.

use std::sync::Once;

use tracing_subscriber::filter::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_TEST_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Install a `tracing` subscriber for the current test binary.
///
/// Honors `RUST_LOG`; output goes through the test writer so it is captured
/// per test unless `--nocapture` is passed. Safe to call from every test.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));
        // Another subscriber may already be installed by the harness.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(feature = "auto-init")]
mod auto {
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}
