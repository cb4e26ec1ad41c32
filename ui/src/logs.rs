//! Logging to the javascript console.

use tracing_subscriber::{EnvFilter, prelude::*};
use tracing_web::MakeWebConsoleWriter;

use crate::config;

/// Target for page-view events when the `ANALYTICS` flag is set.
pub const ANALYTICS_TARGET: &str = "analytics";

/// Initialize logging
pub fn init_logging() {
    let config = config::config();
    let mut directives = if config::debug_enabled() {
        String::from("error,ui=debug,payloads=debug,export=debug")
    } else {
        String::from("error,ui=info,payloads=info")
    };
    if config.analytics {
        directives.push_str(&format!(",{ANALYTICS_TARGET}=info"));
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_ansi(false) // Only partially supported across browsers
        .without_time() // std::time is not available in browsers
        .with_writer(MakeWebConsoleWriter::new().with_pretty_level())
        .with_level(false);

    tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(fmt_layer)
        .init();

    tracing::info!(
        "Initialized logs (backend {}, timeout {:?})",
        config.base_url,
        config.timeout
    );
}

/// Record a page view on the analytics target.
pub fn track_page_view(page: &str) {
    if config::config().analytics {
        tracing::info!(target: ANALYTICS_TARGET, page, "page view");
    }
}
