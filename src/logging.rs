// Log setup for the binary
//
// RUST_LOG wins when set; otherwise the configured level applies. Output goes
// to stderr because `serve` speaks its protocol on stdout.

use crate::error::{NotesError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| NotesError::Config(format!("invalid log level '{}': {}", default_level, e)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| NotesError::Config(format!("logging already initialized: {}", e)))
}
