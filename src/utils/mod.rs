pub mod numeric;
pub mod persistence;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

        let filter = EnvFilter::from_default_env().add_directive(
            "finmate_core=info"
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        );

        // Another subscriber may already be installed by the embedding process.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
