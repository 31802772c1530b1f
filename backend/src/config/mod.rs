//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token signing key and cookie attributes.

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose};
use std::env;

/// Smallest HMAC key accepted for token signing (256 bits).
pub const MIN_JWT_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Decoded HMAC key bytes.
    pub jwt_secret: Vec<u8>,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    pub server_port: u16,
}

impl Config {
    /// Builds a configuration with default pool, hashing and server settings.
    pub fn new(database_url: impl Into<String>, jwt_secret: Vec<u8>) -> Self {
        Config {
            database_url: database_url.into(),
            max_connections: 5,
            acquire_timeout_seconds: 3,
            jwt_secret,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cookie_secure: false,
            server_port: 3000,
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = decode_jwt_secret(
            &env::var("JWT_SECRET").context("JWT_SECRET not set")?,
        )?;

        let bcrypt_cost = parse_bcrypt_cost(env::var("BCRYPT_COST").ok().as_deref())?;

        let cookie_secure = parse_flag(env::var("COOKIE_SECURE").ok().as_deref())
            .context("COOKIE_SECURE must be true or false")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            bcrypt_cost,
            cookie_secure,
            server_port,
        })
    }
}

/// Decodes the base64 signing key and enforces the minimum HMAC key size.
pub fn decode_jwt_secret(encoded: &str) -> Result<Vec<u8>> {
    let key = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("JWT_SECRET must be valid base64")?;

    if key.len() < MIN_JWT_SECRET_BYTES {
        bail!(
            "JWT_SECRET decodes to {} bytes, at least {} are required",
            key.len(),
            MIN_JWT_SECRET_BYTES
        );
    }

    Ok(key)
}

fn parse_bcrypt_cost(raw: Option<&str>) -> Result<u32> {
    let Some(raw) = raw else {
        return Ok(bcrypt::DEFAULT_COST);
    };

    let cost = raw
        .trim()
        .parse::<u32>()
        .context("BCRYPT_COST must be a valid number")?;

    if !(4..=31).contains(&cost) {
        bail!("BCRYPT_COST must be between 4 and 31, got {}", cost);
    }

    Ok(cost)
}

fn parse_flag(raw: Option<&str>) -> Result<bool> {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            other => bail!("unrecognised boolean '{}'", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_jwt_secret() {
        let encoded = general_purpose::STANDARD.encode([7u8; 48]);
        let key = decode_jwt_secret(&encoded).unwrap();
        assert_eq!(key.len(), 48);
    }

    #[test]
    fn test_decode_jwt_secret_rejects_short_keys() {
        let encoded = general_purpose::STANDARD.encode(b"too-short");
        assert!(decode_jwt_secret(&encoded).is_err());
    }

    #[test]
    fn test_decode_jwt_secret_rejects_invalid_base64() {
        assert!(decode_jwt_secret("not base64 at all!").is_err());
    }

    #[test]
    fn test_parse_bcrypt_cost() {
        assert_eq!(parse_bcrypt_cost(None).unwrap(), bcrypt::DEFAULT_COST);
        assert_eq!(parse_bcrypt_cost(Some("4")).unwrap(), 4);
        assert!(parse_bcrypt_cost(Some("3")).is_err());
        assert!(parse_bcrypt_cost(Some("32")).is_err());
        assert!(parse_bcrypt_cost(Some("twelve")).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag(None).unwrap());
        assert!(parse_flag(Some("TRUE")).unwrap());
        assert!(!parse_flag(Some("0")).unwrap());
        assert!(parse_flag(Some("maybe")).is_err());
    }
}
