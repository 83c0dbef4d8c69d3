// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Environment-based configuration management
//!
//! All configuration comes from environment variables; there are no config
//! files. Defaults match a local development setup against a local MongoDB.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 3000;
/// Default document store URL when `MONGODB_URL` is unset
pub const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017";
/// Default database name when `MONGODB_DATABASE` is unset
pub const DEFAULT_DATABASE_NAME: &str = "app";

/// How coupon codes are assigned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodePolicy {
    /// Clients supply a numeric code, unique across all coupons
    #[default]
    ClientSupplied,
    /// The server assigns a unique time-ordered token; client codes are rejected
    ServerGenerated,
}

impl CodePolicy {
    /// Parse from string with fallback to the default policy
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "server" | "server-generated" => Self::ServerGenerated,
            _ => Self::ClientSupplied,
        }
    }
}

impl std::fmt::Display for CodePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientSupplied => write!(f, "client"),
            Self::ServerGenerated => write!(f, "server"),
        }
    }
}

/// Document store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; `memory://` selects the in-memory backend
    pub url: String,
    /// Database holding the coupon collection
    pub database: String,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origin list, or `*` for any origin
    pub allowed_origins: String,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Document store settings
    pub database: DatabaseConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Coupon code assignment policy
    pub code_policy: CodePolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("invalid HTTP_PORT value: {value}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database = DatabaseConfig {
            url: env::var("MONGODB_URL").unwrap_or_else(|_| DEFAULT_MONGODB_URL.into()),
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.into()),
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into()),
        };

        let code_policy = env::var("COUPON_CODE_POLICY")
            .map(|v| CodePolicy::from_str_or_default(&v))
            .unwrap_or_default();

        Ok(Self {
            http_port,
            database,
            cors,
            code_policy,
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} store={} database={} code_policy={}",
            self.http_port, self.database.url, self.database.database, self.code_policy
        )
    }
}
