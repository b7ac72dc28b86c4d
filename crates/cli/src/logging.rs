use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the stderr log subscriber.
///
/// Reads `SCHEMA_DOCTOR_LOG` for per-module levels, e.g.
/// `SCHEMA_DOCTOR_LOG=schema_doctor=debug`. Falls back to warnings only.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SCHEMA_DOCTOR_LOG")
            .unwrap_or_else(|_| EnvFilter::new("schema_doctor=warn,schema_doctor_detectors=warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
