//! Server settings read from the environment

use anyhow::{Context, bail};
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose;
use inquire::InquireConfig;
use platform::mail::SmtpConfig;
use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_SENDER: &str = "Inquire <noreply@localhost>";

pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
    pub inquire: InquireConfig,
    /// None routes notifications to the log
    pub smtp: Option<SmtpConfig>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => 5,
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = parse_origins(
            &var("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
        );

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr,
            frontend_origins,
            inquire: inquire_config()?,
            smtp: smtp_config()?,
        })
    }
}

fn inquire_config() -> anyhow::Result<InquireConfig> {
    let mut config = if cfg!(debug_assertions) {
        InquireConfig::development()
    } else {
        InquireConfig::default()
    };

    match var("SESSION_SECRET") {
        Some(secret) => config.session_secret = decode_secret(&secret)?,
        None if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
        }
        None => bail!("SESSION_SECRET must be set in production"),
    }

    config.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

    if let Some(flag) = var("ENABLE_SEED_ENDPOINT") {
        config.seed_endpoint_enabled = parse_flag(&flag);
    }

    Ok(config)
}

fn smtp_config() -> anyhow::Result<Option<SmtpConfig>> {
    let Some(host) = var("SMTP_HOST") else {
        return Ok(None);
    };

    let port = match var("SMTP_PORT") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("SMTP_PORT is not a port number: {raw}"))?,
        None => DEFAULT_SMTP_PORT,
    };

    Ok(Some(SmtpConfig {
        host,
        port,
        username: var("SMTP_USERNAME"),
        password: var("SMTP_PASSWORD"),
        sender: var("MAIL_SENDER").unwrap_or_else(|| DEFAULT_MAIL_SENDER.to_string()),
    }))
}

/// Set and non-empty
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;

    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret() {
        let encoded = general_purpose::STANDARD.encode([7u8; 32]);
        assert_eq!(decode_secret(&encoded).unwrap(), [7u8; 32]);

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert!(decode_secret(&short).is_err());
        assert!(decode_secret("not base64!").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://localhost:3000, ,https://inquire.example.com");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://inquire.example.com");
    }
}
