// SPDX-License-Identifier: Apache-2.0

//! Logging bootstrap, shared by the `sechecker` binary and tests.
//!
//! Library crates never call this — they only log through the `log`
//! macros. Only a final consumer (a binary, or a test harness) decides
//! whether and how those log records are rendered.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the `env_logger` backend for the `log` facade.
///
/// Idempotent: safe to call from multiple test functions in the same
/// process. Respects `RUST_LOG` the same way every other crate in this
/// ecosystem does.
pub fn init() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .format_timestamp_millis()
            .init();
    });
}
