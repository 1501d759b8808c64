use std::sync::OnceLock;
use tracing_subscriber::filter::{EnvFilter, ParseError};

static INIT_GUARD: OnceLock<()> = OnceLock::new();

/// Install the global stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is used as the filter
/// directive. Calling this more than once is a no-op.
pub fn initialize_logging(level: &str) -> Result<(), ParseError> {
    if INIT_GUARD.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    if INIT_GUARD.set(()).is_err() {
        return Ok(());
    }

    // A subscriber installed by the host (tests, embedding) stays in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();

    Ok(())
}
