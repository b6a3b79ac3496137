use std::net::SocketAddr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "DocuDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the API bind address.
pub const ENV_BIND: &str = "DOCUDESK_BIND";
/// Environment variable overriding the simulated OCR latency (milliseconds).
pub const ENV_OCR_DELAY_MS: &str = "DOCUDESK_OCR_DELAY_MS";
/// Environment variable overriding the simulated assistant latency (milliseconds).
pub const ENV_ASSISTANT_DELAY_MS: &str = "DOCUDESK_ASSISTANT_DELAY_MS";

const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_OCR_DELAY_MS: u64 = 2000;
const DEFAULT_ASSISTANT_DELAY_MS: u64 = 1500;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "docudesk=info,docudesk_lib=info,tower_http=info"
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Latency of the mock OCR engine per upload.
    pub ocr_delay: Duration,
    /// Latency before the assistant replies.
    pub assistant_delay: Duration,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = match lookup(ENV_BIND) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Invalid {ENV_BIND}, using default");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let ocr_delay = parse_millis(&lookup, ENV_OCR_DELAY_MS).unwrap_or(defaults.ocr_delay);
        let assistant_delay =
            parse_millis(&lookup, ENV_ASSISTANT_DELAY_MS).unwrap_or(defaults.assistant_delay);

        Self {
            bind_addr,
            ocr_delay,
            assistant_delay,
        }
    }

    /// Configuration with all simulated latencies removed (tests, demos).
    pub fn instant() -> Self {
        Self {
            ocr_delay: Duration::ZERO,
            assistant_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8787))),
            ocr_delay: Duration::from_millis(DEFAULT_OCR_DELAY_MS),
            assistant_delay: Duration::from_millis(DEFAULT_ASSISTANT_DELAY_MS),
        }
    }
}

/// Whole milliseconds of `delay`, saturating at `u64::MAX`.
pub fn whole_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

fn parse_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Invalid delay, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_name_is_docudesk() {
        assert_eq!(APP_NAME, "DocuDesk");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.ocr_delay, Duration::from_millis(2000));
        assert_eq!(config.assistant_delay, Duration::from_millis(1500));
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_OCR_DELAY_MS, "10"),
            (ENV_ASSISTANT_DELAY_MS, "0"),
        ]));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.ocr_delay, Duration::from_millis(10));
        assert_eq!(config.assistant_delay, Duration::ZERO);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_BIND, "not-an-address"),
            (ENV_OCR_DELAY_MS, "soon"),
        ]));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.ocr_delay, Duration::from_millis(2000));
    }

    #[test]
    fn whole_millis_saturates() {
        assert_eq!(whole_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(whole_millis(Duration::ZERO), 0);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn instant_config_has_no_delays() {
        let config = AppConfig::instant();
        assert_eq!(config.ocr_delay, Duration::ZERO);
        assert_eq!(config.assistant_delay, Duration::ZERO);
    }
}
