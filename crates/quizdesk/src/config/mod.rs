use std::env;
use std::net::{IpAddr, SocketAddr};

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
    pub mailer: MailerConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mailer: MailerConfig::from_env(),
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Outbound mail settings. Every field is optional: hosts without mail
/// configuration still run the full quiz flow, with report delivery skipped.
#[derive(Debug, Clone, Default)]
pub struct MailerConfig {
    pub sender: Option<String>,
    pub password: Option<String>,
    pub recipient: Option<String>,
    pub smtp_relay: String,
}

impl MailerConfig {
    pub const DEFAULT_RELAY: &'static str = "smtp.gmail.com";

    fn from_env() -> Self {
        Self {
            sender: non_empty(env::var("MAIL_SENDER").ok()),
            password: non_empty(env::var("MAIL_PASSWORD").ok()),
            recipient: non_empty(env::var("MAIL_RECIPIENT").ok()),
            smtp_relay: env::var("MAIL_SMTP_RELAY")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_RELAY.to_string()),
        }
    }

    /// Sender address and credential, present only when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.sender.as_deref(), self.password.as_deref()) {
            (Some(sender), Some(password)) => Some((sender, password)),
            _ => None,
        }
    }

    /// Destination for reports; falls back to the sender address when unset.
    pub fn recipient_or_sender(&self) -> Option<&str> {
        self.recipient.as_deref().or(self.sender.as_deref())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
}
