//! Build-time configuration.
//!
//! Values are baked in with `option_env!` when the bundle is built, e.g.
//! `BACKEND_URL=http://localhost:8000/api DEBUG=1 trunk serve`.

use payloads::ClientConfig;
use std::sync::OnceLock;

static CONFIG: OnceLock<ClientConfig> = OnceLock::new();

pub fn config() -> &'static ClientConfig {
    CONFIG.get_or_init(|| ClientConfig::from_lookup(&same_origin_api(), lookup))
}

fn lookup(key: &str) -> Option<String> {
    let value = match key {
        "BACKEND_URL" => option_env!("BACKEND_URL"),
        "API_TIMEOUT_MS" => option_env!("API_TIMEOUT_MS"),
        "TOKEN_REFRESH_INTERVAL_SECS" => option_env!("TOKEN_REFRESH_INTERVAL_SECS"),
        "DEBUG" => option_env!("DEBUG"),
        "ANALYTICS" => option_env!("ANALYTICS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// Without a configured backend the API is assumed to live under `/api` on
/// the origin that served the app.
fn same_origin_api() -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}/api")
}

/// Debug logging is on for debug builds or when `DEBUG` is set.
pub fn debug_enabled() -> bool {
    cfg!(debug_assertions) || config().debug
}

/// True when pointed at a backend on this machine; shows the seeded
/// credentials on the login form.
pub fn is_dev_mode() -> bool {
    let base = &config().base_url;
    base.contains("localhost") || base.contains("127.0.0.1")
}
