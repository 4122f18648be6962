//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging.
///
/// Reads `ECN_SUPER_LOG` for per-module log levels, e.g.
/// `ECN_SUPER_LOG=ecn_super_analysis=debug,ecn_super_storage=warn`.
///
/// Falls back to `ecn_super=info` if `ECN_SUPER_LOG` is not set or is invalid.
/// Calling it more than once is harmless.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ECN_SUPER_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_directives()));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}

fn default_directives() -> &'static str {
    "ecn_super=info,ecn_super_core=info,ecn_super_storage=info,ecn_super_analysis=info"
}
