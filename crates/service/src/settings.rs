//! Runtime settings loaded from the environment.

use std::env;
use std::time::Duration;

use crate::backend::DEFAULT_BACKEND;

/// Process-wide settings shared by the CLI and the HTTP server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Storage backend name passed to [`crate::unit_of_work_for`].
    pub db_type: String,
    pub host: String,
    pub port: u16,
    /// Delay between two frames of the terminal display.
    pub tick_interval: Duration,
    /// `tracing` filter directive, e.g. `warn` or `stoplight=debug`.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_type: DEFAULT_BACKEND.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            tick_interval: Duration::from_millis(1000),
            log_filter: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Construct settings from process environment variables.
    ///
    /// Environment variables:
    /// - `STOPLIGHT_DB_TYPE` - Storage backend (default: inmemory)
    /// - `STOPLIGHT_HOST` - HTTP bind address (default: 127.0.0.1)
    /// - `STOPLIGHT_PORT` - HTTP port (default: 8080)
    /// - `STOPLIGHT_TICK_MS` - Display tick in milliseconds (default: 1000)
    /// - `STOPLIGHT_LOG` - Log filter, falling back to `RUST_LOG` (default: warn)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with a custom variable source.
    ///
    /// Unparseable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(db_type) = non_empty(lookup("STOPLIGHT_DB_TYPE")) {
            settings.db_type = db_type;
        }
        if let Some(host) = non_empty(lookup("STOPLIGHT_HOST")) {
            settings.host = host;
        }
        if let Some(port) = parse(lookup("STOPLIGHT_PORT")) {
            settings.port = port;
        }
        if let Some(ms) = parse::<u64>(lookup("STOPLIGHT_TICK_MS")) {
            settings.tick_interval = Duration::from_millis(ms);
        }
        if let Some(filter) =
            non_empty(lookup("STOPLIGHT_LOG")).or_else(|| non_empty(lookup("RUST_LOG")))
        {
            settings.log_filter = filter;
        }

        settings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]), Settings::default());
    }

    #[test]
    fn variables_override_defaults() {
        let settings = settings_from(&[
            ("STOPLIGHT_DB_TYPE", "postgres"),
            ("STOPLIGHT_HOST", "0.0.0.0"),
            ("STOPLIGHT_PORT", "9090"),
            ("STOPLIGHT_TICK_MS", "250"),
            ("STOPLIGHT_LOG", "debug"),
        ]);
        assert_eq!(settings.db_type, "postgres");
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.tick_interval, Duration::from_millis(250));
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn bad_numbers_keep_defaults() {
        let settings = settings_from(&[("STOPLIGHT_PORT", "eighty"), ("STOPLIGHT_TICK_MS", "-5")]);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.tick_interval, Duration::from_millis(1000));
    }

    #[test]
    fn rust_log_is_the_fallback_filter() {
        let settings = settings_from(&[("RUST_LOG", "info")]);
        assert_eq!(settings.log_filter, "info");
        let settings = settings_from(&[("RUST_LOG", "info"), ("STOPLIGHT_LOG", "trace")]);
        assert_eq!(settings.log_filter, "trace");
    }
}
