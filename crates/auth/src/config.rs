//! Signed-token validation parameters

use sandgate_common::config::normalize_domain;
use sandgate_common::Config;

/// Expected audience and issuer for signed tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub audience: String,
    pub issuer: String,
}

impl AuthConfig {
    /// Build from a tenant domain; the issuer becomes `https://{domain}/`.
    pub fn new(domain: &str, audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            issuer: format!("https://{}/", normalize_domain(domain)),
        }
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            audience: config.auth0_audience.clone(),
            issuer: config.issuer(),
        }
    }
}
