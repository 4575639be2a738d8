//! Logging setup shared by the binaries

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a configured level. `RUST_LOG` takes precedence.
pub fn filter_directive(config: &LoggingConfig) -> String {
    std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("luma={},tower_http=info", config.level))
}

/// Install the global subscriber: pretty or JSON output per config
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::new(filter_directive(config));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
