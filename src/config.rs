//! Application configuration.
//!
//! Values are resolved with priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

// ==================== Server Configuration ====================

/// Default address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

/// Default location of the embedded database
pub const DEFAULT_DATABASE_PATH: &str = "data/catalog.db";

pub const CONFIG_FILE: &str = "config.toml";

// ==================== Session Configuration ====================

/// Admin session lifetime in hours
pub const ADMIN_SESSION_HOURS: i64 = 8;

/// Longest accepted admin session lifetime (one year)
pub const MAX_ADMIN_SESSION_HOURS: i64 = 24 * 365;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

pub const ADMIN_SESSION_COOKIE: &str = "certiswift_admin";

/// Visitor display name, readable by templates
pub const USER_COOKIE: &str = "certiswift_user";

/// Anonymous per-browser key used for support rate limiting
pub const CLIENT_COOKIE: &str = "certiswift_client";

/// Visitor cookies live for a year
pub const VISITOR_COOKIE_DAYS: i64 = 365;

pub const MAX_DISPLAY_NAME_CHARS: usize = 50;

pub const MIN_ADMIN_PASSWORD_CHARS: usize = 8;

// ==================== Progress Configuration ====================

/// Increment applied by the "+10%" button
pub const DEFAULT_PROGRESS_INCREMENT: f64 = 10.0;

/// Module count shown by the tracker on course pages
pub const COURSE_TOTAL_MODULES: u32 = 25;

// ==================== Support Configuration ====================

/// Minimum seconds between successful support submissions per client
pub const SUPPORT_RATE_LIMIT_SECS: u64 = 60;

pub const SUPPORT_NAME_MIN_CHARS: usize = 2;
pub const SUPPORT_SUBJECT_MIN_CHARS: usize = 5;
pub const SUPPORT_SUBJECT_MAX_CHARS: usize = 100;
pub const SUPPORT_MESSAGE_MIN_CHARS: usize = 10;
pub const SUPPORT_MESSAGE_MAX_CHARS: usize = 1000;

/// Timeout for outbound webhook and DNS requests
pub const OUTBOUND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config.toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("unknown store backend '{0}' (expected 'sqlite' or 'rest')")]
    UnknownBackend(String),

    #[error("the rest store backend requires {0}")]
    Missing(&'static str),
}

/// Which `CatalogStore` implementation to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Rest,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "local" => Some(Self::Sqlite),
            "rest" | "supabase" | "remote" => Some(Self::Rest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Rest => "rest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub url: Option<String>,
    pub key: Option<String>,
    /// Insert sample courses when the embedded catalog is empty
    pub seed: bool,
}

#[derive(Debug, Clone)]
pub struct SupportConfig {
    pub webhook_url: Option<String>,
    pub rate_limit_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub session_hours: i64,
    pub bootstrap_email: Option<String>,
    pub bootstrap_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub support: SupportConfig,
    pub admin: AdminConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: SERVER_ADDR.to_string(),
                port: SERVER_PORT,
            },
            store: StoreConfig {
                backend: StoreBackend::Sqlite,
                path: PathBuf::from(DEFAULT_DATABASE_PATH),
                url: None,
                key: None,
                seed: true,
            },
            support: SupportConfig {
                webhook_url: None,
                rate_limit_secs: SUPPORT_RATE_LIMIT_SECS,
            },
            admin: AdminConfig {
                session_hours: ADMIN_SESSION_HOURS,
                bootstrap_email: None,
                bootstrap_password: None,
            },
        }
    }
}

// ==================== config.toml layout ====================

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<FileServer>,
    store: Option<FileStore>,
    support: Option<FileSupport>,
    admin: Option<FileAdmin>,
}

#[derive(Debug, Default, Deserialize)]
struct FileServer {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct FileStore {
    backend: Option<String>,
    path: Option<String>,
    url: Option<String>,
    key: Option<String>,
    seed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSupport {
    webhook_url: Option<String>,
    rate_limit_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileAdmin {
    session_hours: Option<i64>,
    bootstrap_email: Option<String>,
}

impl AppConfig {
    /// Load from config.toml and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let contents = std::fs::read_to_string(CONFIG_FILE).ok();
        if contents.is_some() {
            tracing::info!("Using configuration from {}", CONFIG_FILE);
        }
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve every value from an optional TOML document and an env lookup
    pub fn from_sources(
        toml_contents: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = match toml_contents {
            Some(contents) => toml::from_str(contents)?,
            None => FileConfig::default(),
        };
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let server = file.server.unwrap_or_default();
        let store = file.store.unwrap_or_default();
        let support = file.support.unwrap_or_default();
        let admin = file.admin.unwrap_or_default();

        let port = match server.port {
            Some(port) => port,
            None => parse_env(env("PORT"), "PORT")?.unwrap_or(defaults.server.port),
        };

        let backend_raw = store.backend.or_else(|| env("STORE_BACKEND"));
        let backend = match backend_raw {
            Some(raw) => StoreBackend::from_str(&raw).ok_or(ConfigError::UnknownBackend(raw))?,
            None => defaults.store.backend,
        };

        let seed = match store.seed {
            Some(seed) => seed,
            None => parse_env(env("STORE_SEED"), "STORE_SEED")?.unwrap_or(defaults.store.seed),
        };

        let rate_limit_secs = match support.rate_limit_secs {
            Some(secs) => secs,
            None => parse_env(env("SUPPORT_RATE_LIMIT_SECS"), "SUPPORT_RATE_LIMIT_SECS")?
                .unwrap_or(defaults.support.rate_limit_secs),
        };

        let session_hours = match admin.session_hours {
            Some(hours) => hours,
            None => parse_env(env("ADMIN_SESSION_HOURS"), "ADMIN_SESSION_HOURS")?
                .unwrap_or(defaults.admin.session_hours),
        };
        if !(1..=MAX_ADMIN_SESSION_HOURS).contains(&session_hours) {
            return Err(ConfigError::InvalidValue {
                key: "ADMIN_SESSION_HOURS",
                value: session_hours.to_string(),
            });
        }

        let config = Self {
            server: ServerConfig {
                addr: server
                    .addr
                    .or_else(|| env("BIND_ADDR"))
                    .unwrap_or(defaults.server.addr),
                port,
            },
            store: StoreConfig {
                backend,
                path: store
                    .path
                    .or_else(|| env("DATABASE_PATH"))
                    .map(PathBuf::from)
                    .unwrap_or(defaults.store.path),
                url: store.url.or_else(|| env("STORE_URL")),
                key: store.key.or_else(|| env("STORE_KEY")),
                seed,
            },
            support: SupportConfig {
                webhook_url: support.webhook_url.or_else(|| env("SUPPORT_WEBHOOK_URL")),
                rate_limit_secs,
            },
            admin: AdminConfig {
                session_hours,
                bootstrap_email: admin.bootstrap_email.or_else(|| env("ADMIN_BOOTSTRAP_EMAIL")),
                // Secrets never come from the config file
                bootstrap_password: env("ADMIN_BOOTSTRAP_PASSWORD"),
            },
        };

        if config.store.backend == StoreBackend::Rest {
            if config.store.url.is_none() {
                return Err(ConfigError::Missing("STORE_URL"));
            }
            if config.store.key.is_none() {
                return Err(ConfigError::Missing("STORE_KEY"));
            }
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert!(config.store.seed);
        assert_eq!(config.support.rate_limit_secs, 60);
        assert!(config.support.webhook_url.is_none());
        assert_eq!(config.admin.session_hours, 8);
    }

    #[test]
    fn test_toml_overrides_env() {
        let toml = r#"
            [server]
            port = 8080

            [store]
            path = "/tmp/from-toml.db"
        "#;
        let env = env_from(&[("PORT", "9090"), ("DATABASE_PATH", "/tmp/from-env.db"), ("BIND_ADDR", "127.0.0.1")]);
        let config = AppConfig::from_sources(Some(toml), env).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.path, PathBuf::from("/tmp/from-toml.db"));
        assert_eq!(config.server.addr, "127.0.0.1");
    }

    #[test]
    fn test_rest_backend_requires_url_and_key() {
        let env = env_from(&[("STORE_BACKEND", "rest"), ("STORE_URL", "https://x.supabase.co")]);
        assert!(matches!(
            AppConfig::from_sources(None, env),
            Err(ConfigError::Missing("STORE_KEY"))
        ));

        let env = env_from(&[
            ("STORE_BACKEND", "rest"),
            ("STORE_URL", "https://x.supabase.co"),
            ("STORE_KEY", "anon"),
        ]);
        let config = AppConfig::from_sources(None, env).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Rest);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            AppConfig::from_sources(None, env_from(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
        assert!(matches!(
            AppConfig::from_sources(None, env_from(&[("STORE_BACKEND", "mongo")])),
            Err(ConfigError::UnknownBackend(_))
        ));
        assert!(matches!(
            AppConfig::from_sources(None, env_from(&[("ADMIN_SESSION_HOURS", "0")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(AppConfig::from_sources(None, env_from(&[("ADMIN_SESSION_HOURS", "8760")])).is_ok());
    }

    #[test]
    fn test_oversized_session_lifetime_is_rejected() {
        let huge = i64::MAX.to_string();
        assert!(matches!(
            AppConfig::from_sources(None, env_from(&[("ADMIN_SESSION_HOURS", huge.as_str())])),
            Err(ConfigError::InvalidValue { key: "ADMIN_SESSION_HOURS", .. })
        ));
        assert!(matches!(
            AppConfig::from_sources(Some("[admin]\nsession_hours = 8761"), env_from(&[])),
            Err(ConfigError::InvalidValue { key: "ADMIN_SESSION_HOURS", .. })
        ));
        assert!(AppConfig::from_sources(Some("[server\nport="), env_from(&[])).is_err());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = AppConfig::from_sources(None, env_from(&[("SUPPORT_WEBHOOK_URL", "  ")])).unwrap();
        assert!(config.support.webhook_url.is_none());
    }

    #[test]
    fn test_bootstrap_password_only_from_env() {
        let toml = "[admin]\nbootstrap_email = \"root@example.com\"\n";
        let env = env_from(&[("ADMIN_BOOTSTRAP_PASSWORD", "changeme123")]);
        let config = AppConfig::from_sources(Some(toml), env).unwrap();
        assert_eq!(config.admin.bootstrap_email.as_deref(), Some("root@example.com"));
        assert_eq!(config.admin.bootstrap_password.as_deref(), Some("changeme123"));
    }
}
