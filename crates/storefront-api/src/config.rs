//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;
use storefront_cart::domain::policy::ZeroQuantityPolicy;
use tracing::info;

use crate::error::AppError;
use crate::state::DEFAULT_IDENTITY_HEADER;

/// Settings for the API server.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Upper bound on pooled database connections.
    pub database_max_connections: u32,
    /// Whether to apply pending migrations at startup.
    pub run_migrations: bool,
    /// Trusted header carrying the customer id.
    pub identity_header: HeaderName,
    /// What a decrement below one unit does.
    pub zero_quantity_policy: ZeroQuantityPolicy,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or any variable
    /// holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or any variable
    /// holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL environment variable must be set".into()))?;

        let identity_header: String = parse_or(&lookup, "IDENTITY_HEADER", DEFAULT_IDENTITY_HEADER)?;
        let identity_header = HeaderName::from_str(&identity_header.to_ascii_lowercase())
            .map_err(|e| AppError::Config(format!("IDENTITY_HEADER must be a valid header name: {e}")))?;

        Ok(Self {
            database_url,
            host: parse_or(&lookup, "HOST", "0.0.0.0")?,
            port: parse_or(&lookup, "PORT", "3000")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", "10")?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", "true")?,
            identity_header,
            zero_quantity_policy: parse_or(&lookup, "CART_ZERO_QUANTITY_POLICY", "remove")?,
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        })
    }

    /// The address to bind the listener to.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host` and `port` do not form a socket
    /// address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} has an invalid value {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_only_database_url_is_set() {
        // Act
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/shop")]).unwrap();

        // Assert
        assert_eq!(config.database_url, "postgres://localhost/shop");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 10);
        assert!(config.run_migrations);
        assert_eq!(config.identity_header, "x-customer-id");
        assert_eq!(config.zero_quantity_policy, ZeroQuantityPolicy::Remove);
        assert_eq!(config.otlp_endpoint, None);
    }

    #[test]
    fn test_missing_database_url_is_a_config_error() {
        let result = config_from(&[]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/shop"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("RUN_MIGRATIONS", "false"),
            ("IDENTITY_HEADER", "X-User-Id"),
            ("CART_ZERO_QUANTITY_POLICY", "keep"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(!config.run_migrations);
        assert_eq!(config.identity_header, "x-user-id");
        assert_eq!(config.zero_quantity_policy, ZeroQuantityPolicy::Keep);
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = config_from(&[("DATABASE_URL", "postgres://db/shop"), ("PORT", "eighty")]);

        assert!(matches!(result, Err(AppError::Config(message)) if message.contains("PORT")));
    }

    #[test]
    fn test_invalid_policy_is_a_config_error() {
        let result = config_from(&[
            ("DATABASE_URL", "postgres://db/shop"),
            ("CART_ZERO_QUANTITY_POLICY", "clamp"),
        ]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
