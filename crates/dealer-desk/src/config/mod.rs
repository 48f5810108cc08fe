use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_OPERATOR_EMAIL: &str = "info@jc-motorhomes.be";
const DEFAULT_FROM_EMAIL: &str = "J&C Motorhomes <noreply@jc-motorhomes.be>";
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Longest admin session a verifier will issue: one week.
pub const MAX_SESSION_TTL_MINUTES: u64 = 7 * 24 * 60;

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
    pub notification: NotificationConfig,
    pub admin: AdminConfig,
    pub images: ImageStoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let timeout_secs = parse_number("NOTIFY_TIMEOUT_SECS", 10)?;
        let notification = NotificationConfig {
            operator_address: env::var("NOTIFY_OPERATOR_EMAIL")
                .unwrap_or_else(|_| DEFAULT_OPERATOR_EMAIL.to_string()),
            from_address: env::var("NOTIFY_FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
            resend_api_key: non_blank_var("RESEND_API_KEY"),
            resend_api_url: env::var("RESEND_API_URL")
                .unwrap_or_else(|_| DEFAULT_RESEND_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let admin = AdminConfig {
            api_token: non_blank_var("ADMIN_API_TOKEN"),
            session_ttl_minutes: parse_bounded(
                "ADMIN_SESSION_TTL_MINUTES",
                60,
                1,
                MAX_SESSION_TTL_MINUTES,
            )?,
            login_path: env::var("ADMIN_LOGIN_PATH").unwrap_or_else(|_| "/admin/login".to_string()),
        };

        let images = ImageStoreConfig {
            root: PathBuf::from(
                env::var("IMAGE_STORE_DIR")
                    .unwrap_or_else(|_| "./data/motorhome-images".to_string()),
            ),
            public_base_url: env::var("IMAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "/media/motorhome-images".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            notification,
            admin,
            images,
        })
    }
}

fn non_blank_var(key: &'static str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bounded(
    key: &'static str,
    default: u64,
    min: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let value = parse_number(key, default)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { key, min, max })
    }
}

fn parse_number(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Operator notification settings. Without an API key the relay logs messages
/// instead of sending them.
#[derive(Clone)]
pub struct NotificationConfig {
    pub operator_address: String,
    pub from_address: String,
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("operator_address", &self.operator_address)
            .field("from_address", &self.from_address)
            .field("resend_api_key", &self.resend_api_key.as_ref().map(|_| "<redacted>"))
            .field("resend_api_url", &self.resend_api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Admin console access. Admin routes reject every request while `api_token` is unset.
#[derive(Clone)]
pub struct AdminConfig {
    pub api_token: Option<String>,
    pub session_ttl_minutes: u64,
    pub login_path: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .field("login_path", &self.login_path)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ImageStoreConfig {
    pub root: PathBuf,
    pub public_base_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    OutOfRange {
        key: &'static str,
        min: u64,
        max: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::OutOfRange { key, min, max } => {
                write!(f, "{key} must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
