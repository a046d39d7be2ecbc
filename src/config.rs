//! Client settings loaded from a TOML file and `GAMETRADE_*` environment
//! variables.
//!
//! Recognized keys use dotted property names, so both of these work:
//!
//! ```toml
//! api.base.url = "http://localhost:8080/api"
//! api.retry.maxAttempts = 3
//!
//! [session]
//! timeout = 1800000
//! ```
//!
//! Loading never fails. A missing or malformed file falls back to the
//! defaults, and each key that is absent or invalid falls back on its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "GAMETRADE_CONFIG";
/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// HTTP endpoint, timeout and retry settings for [`crate::ApiClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// Prefix every request path is appended to.
    pub base_url: String,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-read timeout in milliseconds.
    pub read_timeout_ms: u64,
    /// Total attempts per call, including the first one. Never below 1.
    pub max_retries: u32,
    /// Linear backoff unit in milliseconds.
    pub retry_delay_ms: u64,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api";

    /// Defaults with a different base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Shorthand for `AppConfig::load().api`.
    pub fn load() -> Self {
        AppConfig::load().api
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            connect_timeout_ms: 5_000,
            read_timeout_ms: 5_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

/// Session expiry settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    /// Idle lifetime of a login in milliseconds.
    pub timeout_ms: u64,
    /// How often a UI should re-check [`crate::Session::is_logged_in`].
    ///
    /// [`crate::Session`] evaluates expiry on every read and never reads this.
    pub check_interval_ms: u64,
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1_800_000,
            check_interval_ms: 60_000,
        }
    }
}

/// Logging preferences for the embedding application.
///
/// The library only emits `tracing` events; these values are meant for
/// whoever installs the subscriber.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    pub file_enabled: bool,
    pub file_path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file_enabled: false,
            file_path: PathBuf::from("logs/app.log"),
        }
    }
}

/// Every setting read from the external key/value source.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppConfig {
    pub api: ClientConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

type Apply = fn(&mut AppConfig, &toml::Value) -> bool;

struct Key {
    property: &'static str,
    env: &'static str,
    apply: Apply,
}

const KEYS: &[Key] = &[
    Key {
        property: "api.base.url",
        env: "GAMETRADE_API_BASE_URL",
        apply: |config, value| {
            read_url(value)
                .map(|url| config.api.base_url = url)
                .is_some()
        },
    },
    Key {
        property: "api.timeout.connect",
        env: "GAMETRADE_API_TIMEOUT_CONNECT",
        apply: |config, value| {
            read_positive(value)
                .map(|ms| config.api.connect_timeout_ms = ms)
                .is_some()
        },
    },
    Key {
        property: "api.timeout.read",
        env: "GAMETRADE_API_TIMEOUT_READ",
        apply: |config, value| {
            read_positive(value)
                .map(|ms| config.api.read_timeout_ms = ms)
                .is_some()
        },
    },
    Key {
        property: "api.retry.maxAttempts",
        env: "GAMETRADE_API_RETRY_MAX_ATTEMPTS",
        apply: |config, value| {
            read_positive(value)
                .and_then(|n| u32::try_from(n).ok())
                .map(|n| config.api.max_retries = n)
                .is_some()
        },
    },
    Key {
        property: "api.retry.delay",
        env: "GAMETRADE_API_RETRY_DELAY",
        apply: |config, value| {
            read_u64(value)
                .map(|ms| config.api.retry_delay_ms = ms)
                .is_some()
        },
    },
    Key {
        property: "session.timeout",
        env: "GAMETRADE_SESSION_TIMEOUT",
        apply: |config, value| {
            read_positive(value)
                .map(|ms| config.session.timeout_ms = ms)
                .is_some()
        },
    },
    Key {
        property: "session.checkInterval",
        env: "GAMETRADE_SESSION_CHECK_INTERVAL",
        apply: |config, value| {
            read_positive(value)
                .map(|ms| config.session.check_interval_ms = ms)
                .is_some()
        },
    },
    Key {
        property: "log.level",
        env: "GAMETRADE_LOG_LEVEL",
        apply: |config, value| {
            read_level(value)
                .map(|level| config.log.level = level)
                .is_some()
        },
    },
    Key {
        property: "log.file.enabled",
        env: "GAMETRADE_LOG_FILE_ENABLED",
        apply: |config, value| {
            read_bool(value)
                .map(|enabled| config.log.file_enabled = enabled)
                .is_some()
        },
    },
    Key {
        property: "log.file.path",
        env: "GAMETRADE_LOG_FILE_PATH",
        apply: |config, value| {
            read_string(value)
                .map(|path| config.log.file_path = PathBuf::from(path))
                .is_some()
        },
    },
];

impl AppConfig {
    /// Loads from `$GAMETRADE_CONFIG` (or `./config.toml`) and the process
    /// environment.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from_path(path)
    }

    /// Loads from an explicit file plus the process environment.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "config file {} unavailable ({err}), using defaults",
                    path.display()
                );
                #[cfg(not(feature = "tracing"))]
                let _ = err;
                None
            }
        };
        Self::from_sources(contents.as_deref(), |name| std::env::var(name).ok())
    }

    /// Parses TOML contents alone, without environment overrides.
    pub fn from_toml_str(contents: &str) -> Self {
        Self::from_sources(Some(contents), |_| None)
    }

    /// Builds a config from optional file contents and an environment lookup.
    ///
    /// Environment values win over file values.
    pub fn from_sources<F>(file: Option<&str>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(contents) = file {
            match contents.parse::<toml::Table>() {
                Ok(table) => {
                    for key in KEYS {
                        if let Some(value) = lookup(&table, key.property) {
                            config.apply(key, value, key.property);
                        }
                    }
                }
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("config file is not valid TOML ({err}), using defaults");
                    #[cfg(not(feature = "tracing"))]
                    let _ = err;
                }
            }
        }

        for key in KEYS {
            if let Some(raw) = env(key.env) {
                config.apply(key, &toml::Value::String(raw), key.env);
            }
        }

        config
    }

    fn apply(&mut self, key: &Key, value: &toml::Value, source: &str) {
        if !(key.apply)(self, value) {
            #[cfg(feature = "tracing")]
            tracing::warn!("ignoring invalid value for {source}: {value}");
            #[cfg(not(feature = "tracing"))]
            let _ = source;
        }
    }
}

/// Finds `a.b.c` either as nested tables or as a single quoted key.
fn lookup<'a>(table: &'a toml::Table, property: &str) -> Option<&'a toml::Value> {
    if let Some(value) = table.get(property) {
        return Some(value);
    }
    let mut parts = property.split('.');
    let mut current = table.get(parts.next()?)?;
    for part in parts {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

fn read_u64(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(n) => u64::try_from(*n).ok(),
        toml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_positive(value: &toml::Value) -> Option<u64> {
    read_u64(value).filter(|n| *n > 0)
}

fn read_string(value: &toml::Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn read_url(value: &toml::Value) -> Option<String> {
    read_string(value)
        .map(|url| url.trim_end_matches('/').to_owned())
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
}

fn read_bool(value: &toml::Value) -> Option<bool> {
    match value {
        toml::Value::Boolean(b) => Some(*b),
        toml::Value::String(s) => s.trim().to_ascii_lowercase().parse().ok(),
        _ => None,
    }
}

fn read_level(value: &toml::Value) -> Option<String> {
    let level = read_string(value)?.to_ascii_lowercase();
    matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error").then_some(level)
}
