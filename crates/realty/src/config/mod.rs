use crate::listings::DEFAULT_MAX_PAGE_SIZE;
use crate::store::{InMemoryDocumentStore, StoreBackend};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const MEMORY_SCHEME: &str = "memory://";
const DEFAULT_DATABASE_NAME: &str = "realty";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub browse: BrowseConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::parse(&env::var("APP_LOG_FORMAT").unwrap_or_default())?;

        let max_page_size = match non_empty_var("APP_MAX_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize)?,
            None => DEFAULT_MAX_PAGE_SIZE,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            store: StoreConfig {
                database_url: non_empty_var("DATABASE_URL"),
                database_name: non_empty_var("DATABASE_NAME"),
            },
            browse: BrowseConfig { max_page_size },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Document store connection target. Only presence is reported by diagnostics.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub database_url: Option<String>,
    pub database_name: Option<String>,
}

impl StoreConfig {
    /// Opens the backend named by `DATABASE_URL`. A missing URL yields an unconfigured
    /// backend rather than an error so the process can still report diagnostics.
    pub fn open(&self) -> Result<StoreBackend, ConfigError> {
        let Some(url) = self.database_url.as_deref() else {
            return Ok(StoreBackend::Unconfigured);
        };

        let Some(rest) = url.strip_prefix(MEMORY_SCHEME) else {
            return Err(ConfigError::UnsupportedDatabaseUrl(redact(url)));
        };

        let name = self
            .database_name
            .clone()
            .or_else(|| Some(rest.trim_matches('/').to_string()).filter(|name| !name.is_empty()))
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        Ok(StoreBackend::Memory(InMemoryDocumentStore::new(name)))
    }
}

/// Keeps only the scheme so credentials never reach logs or error bodies.
fn redact(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, _)) => format!("{scheme}://…"),
        None => "<unparseable>".to_string(),
    }
}

/// Limits applied to property browsing.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    pub max_page_size: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidPageSize,
    UnsupportedDatabaseUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "APP_MAX_PAGE_SIZE must be a positive integer")
            }
            ConfigError::UnsupportedDatabaseUrl(url) => {
                write!(f, "DATABASE_URL scheme is not supported: {url}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidPageSize
            | ConfigError::UnsupportedDatabaseUrl(_) => None,
        }
    }
}
