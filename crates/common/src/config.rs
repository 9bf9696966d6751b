//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

const DEFAULT_SANDBOX_API_BASE_URL: &str = "https://api.sandbox.neo4j.com";
const DEFAULT_SANDBOX_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 9100;
const DEFAULT_RUST_LOG: &str = "sandgate=info,tower_http=info";

#[derive(Clone)]
pub struct Config {
    /// Auth0 tenant domain, normalized to a bare host (e.g. `tenant.auth0.com`)
    pub auth0_domain: String,
    /// Audience every signed token must carry
    pub auth0_audience: String,
    /// Shared secret for HS256 tokens. HS256 is rejected when unset.
    pub auth0_client_secret: Option<String>,

    /// Sandbox provisioning API
    pub sandbox_api_base_url: String,
    pub sandbox_api_timeout_secs: u64,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("auth0_domain", &self.auth0_domain)
            .field("auth0_audience", &self.auth0_audience)
            .field(
                "auth0_client_secret",
                &self.auth0_client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sandbox_api_base_url", &self.sandbox_api_base_url)
            .field("sandbox_api_timeout_secs", &self.sandbox_api_timeout_secs)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let auth0_domain = required("AUTH0_DOMAIN")?;
        let auth0_audience = required("AUTH0_AUDIENCE")?;

        let sandbox_api_timeout_secs = match env::var("SANDBOX_API_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("SANDBOX_API_TIMEOUT_SECS must be a whole number of seconds")
            })?,
            Err(_) => DEFAULT_SANDBOX_API_TIMEOUT_SECS,
        };

        let config = Self {
            auth0_domain: normalize_domain(&auth0_domain),
            auth0_audience,
            auth0_client_secret: env::var("AUTH0_CLIENT_SECRET")
                .ok()
                .filter(|secret| !secret.is_empty()),

            sandbox_api_base_url: env::var("SANDBOX_API_HOSTNAME")
                .unwrap_or_else(|_| DEFAULT_SANDBOX_API_BASE_URL.to_string()),
            sandbox_api_timeout_secs,

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(config)
    }

    /// Well-known key-set location of the trust authority
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.auth0_domain)
    }

    /// Expected `iss` claim, always `https://{domain}/`
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.auth0_domain)
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow::anyhow!("{} is required", name)),
    }
}

/// Strip scheme and trailing slashes so `https://tenant.auth0.com/` and
/// `tenant.auth0.com` produce the same issuer.
pub fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme.trim_end_matches('/').to_string()
}
