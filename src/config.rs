use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::pipeline::extraction::HtmlEngine;

/// Application-level constants
pub const APP_NAME: &str = "Newscheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Delegate base URL used when `ML_SERVICE_URL` is unset (local development).
pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Budget for fetching a third-party page.
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);
/// Redirect hops allowed before a fetch is abandoned.
pub const MAX_REDIRECTS: usize = 10;
/// Budget for one inference round trip.
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(30);
/// Budget for the delegate liveness probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Sent on page fetches; many news sites reject obvious bot agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "newscheck_lib=info,newscheck=info,tower_http=info".to_string()
}

/// Process-level settings, read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub ml_service_url: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub html_engine: HtmlEngine,
}

impl ServiceConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (testable without
    /// touching the process environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ml_service_url = match get("ML_SERVICE_URL") {
            Some(url) => url,
            None => {
                tracing::warn!(
                    default = DEFAULT_ML_SERVICE_URL,
                    "ML_SERVICE_URL not set, using default"
                );
                DEFAULT_ML_SERVICE_URL.to_string()
            }
        };

        let port = parse_or_default(get("PORT"), "PORT", DEFAULT_PORT);
        let timeout_secs = parse_or_default(
            get("REQUEST_TIMEOUT"),
            "REQUEST_TIMEOUT",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        );

        let html_engine = match get("HTML_ENGINE") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Unknown HTML_ENGINE, using dom");
                HtmlEngine::Dom
            }),
            None => HtmlEngine::Dom,
        };

        Self {
            ml_service_url,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            html_engine,
        }
    }

    /// Address the HTTP server binds to (all interfaces).
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_or_default<T: std::str::FromStr + Copy + std::fmt::Display>(
    raw: Option<String>,
    key: &str,
    default: T,
) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, default = %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
