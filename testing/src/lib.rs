pub use insta::{self, assert_snapshot, with_settings};
use tracing::Level;

/// Runs `$f` with snapshot filters that hide temporary directories, so
/// snapshots of generated paths are stable across machines.
#[macro_export]
macro_rules! insta_test {
    ($f: expr) => {
        $crate::with_settings!({filters => $crate::path_filters()}, {
            ($f)()
        })
    };
}

pub fn path_filters() -> Vec<(&'static str, &'static str)> {
    vec![
        (r"/tmp/\.tmp[A-Za-z0-9]+", "[TEMP]"),
        (r"/var/folders/[^ ]+/\.tmp[A-Za-z0-9]+", "[TEMP]"),
    ]
}

/// Initialises a trace-level subscriber once per test binary; output goes
/// through the test harness capture.
pub fn logging() {
    use std::sync::Once;

    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .init();
    });
}
