//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>); an
//!   `https` URL marks the session cookie `Secure`
//! - `STOREFRONT_FIXTURES_DIR` - Directory to load fixture JSON from instead of
//!   the embedded set
//! - `ADMIN_GATE_DELAY_MS` - Artificial delay before the admin gate resolves
//!   (default: 800)
//! - `DEMO_SESSION_TTL_HOURS` - Lifetime of demo session tokens (default: 24)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_GATE_DELAY_MS: &str = "800";
const DEFAULT_SESSION_TTL_HOURS: &str = "24";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Fixture directory overriding the embedded data
    pub fixtures_dir: Option<PathBuf>,
    /// Delay before the admin gate evaluates the session
    pub gate_delay: Duration,
    /// Lifetime of tokens written by the demo session controls
    pub session_ttl: TimeDelta,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", DEFAULT_HOST)?;
        let port = env.parse_or("STOREFRONT_PORT", DEFAULT_PORT)?;
        let base_url = env.parse_or("STOREFRONT_BASE_URL", DEFAULT_BASE_URL)?;
        let fixtures_dir = env.optional("STOREFRONT_FIXTURES_DIR").map(PathBuf::from);

        let delay_ms: u64 = env.parse_or("ADMIN_GATE_DELAY_MS", DEFAULT_GATE_DELAY_MS)?;
        let ttl_hours: i64 = env.parse_or("DEMO_SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DEMO_SESSION_TTL_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }
        let session_ttl = TimeDelta::try_hours(ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "DEMO_SESSION_TTL_HOURS".to_string(),
                    "expiry would be out of range".to_string(),
                )
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            fixtures_dir,
            gate_delay: Duration::from_millis(delay_ms),
            session_ttl,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the session cookie should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.optional(key).unwrap_or_else(|| default.to_string());
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.gate_delay, Duration::from_millis(800));
        assert_eq!(config.session_ttl, TimeDelta::hours(24));
        assert!(config.fixtures_dir.is_none());
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://bazaar.example.com"),
            ("STOREFRONT_FIXTURES_DIR", "/srv/fixtures"),
            ("ADMIN_GATE_DELAY_MS", "0"),
            ("DEMO_SESSION_TTL_HOURS", "2"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.secure_cookies());
        assert_eq!(config.fixtures_dir, Some(PathBuf::from("/srv/fixtures")));
        assert!(config.gate_delay.is_zero());
        assert_eq!(config.session_ttl, TimeDelta::hours(2));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("STOREFRONT_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));

        let err = load(&[("STOREFRONT_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_BASE_URL"));

        let err = load(&[("DEMO_SESSION_TTL_HOURS", "0")]).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_session_ttl_must_keep_expiry_in_range() {
        for hours in ["10000000000", "9223372036854775807"] {
            let err = load(&[("DEMO_SESSION_TTL_HOURS", hours)]).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{hours}");
        }

        let config = load(&[("DEMO_SESSION_TTL_HOURS", "1000000")]).unwrap();
        assert_eq!(config.session_ttl, TimeDelta::hours(1_000_000));
    }
}
