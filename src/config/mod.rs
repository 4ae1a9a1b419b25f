pub mod session;

use std::env;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://orca.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ADMIN_NAME: &str = "Administrador";

/// Minimum decoded length of `SECRET_KEY` in production.
pub const MIN_SECRET_BYTES: usize = 64;

const PLACEHOLDER_SECRETS: [&str; 4] = ["secreta", "example", "changeme", "default"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
    #[error("Invalid HOST value: {0}")]
    InvalidHost(String),
    #[error("Production requires HTTPS. Set FORCE_HTTPS=true")]
    HttpsRequired,
    #[error("SECRET_KEY must be set in production")]
    MissingSecretKey,
    #[error("SECRET_KEY must be at least {MIN_SECRET_BYTES} bytes in production, got {0}")]
    ShortSecretKey(usize),
    #[error("SECRET_KEY looks like a placeholder. Generate a random secret")]
    PlaceholderSecretKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `ENVIRONMENT=production` selects production; anything else is development.
    pub fn current() -> Self {
        match env::var("ENVIRONMENT").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Credential for the administrator created on first start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,
    /// Raw `SECRET_KEY`, base64 or plain text.
    pub secret_key: Option<String>,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    /// Reads the process environment. A production environment without HTTPS
    /// or with a weak `SECRET_KEY` is rejected here, before anything binds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = non_empty_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host_raw = non_empty_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_raw.clone()))?;

        let port = match non_empty_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let environment = Environment::current();
        let secret_key = non_empty_var("SECRET_KEY");

        if environment.is_production() {
            check_production(flag_enabled("FORCE_HTTPS"), secret_key.as_deref())?;
        }

        let admin_seed = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: non_empty_var("ADMIN_NAME")
                    .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(AppConfig {
            database_url,
            host,
            port,
            environment,
            secret_key,
            admin_seed,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn check_production(force_https: bool, secret_key: Option<&str>) -> Result<(), ConfigError> {
    if !force_https {
        return Err(ConfigError::HttpsRequired);
    }

    let secret = secret_key.ok_or(ConfigError::MissingSecretKey)?;

    let lowered = secret.to_ascii_lowercase();
    if PLACEHOLDER_SECRETS
        .iter()
        .any(|placeholder| lowered.contains(placeholder))
    {
        return Err(ConfigError::PlaceholderSecretKey);
    }

    let length = session::secret_bytes(secret).len();
    if length < MIN_SECRET_BYTES {
        return Err(ConfigError::ShortSecretKey(length));
    }

    Ok(())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn flag_enabled(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false)
}

pub fn is_production() -> bool {
    Environment::current().is_production()
}
