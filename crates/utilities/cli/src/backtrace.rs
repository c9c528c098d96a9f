//! Helper to set the backtrace env var.

use std::sync::Once;

static INIT: Once = Once::new();

/// Sets `RUST_BACKTRACE=1` unless a value is already set.
///
/// Must run before any other thread is spawned, typically first thing in `main`.
pub fn enable() {
    INIT.call_once(|| {
        if std::env::var_os("RUST_BACKTRACE").is_none() {
            // SAFETY: called once from `main` before the runtime spawns any thread.
            unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
        }
    });
}
