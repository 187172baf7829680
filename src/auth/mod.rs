//! Bearer-token identity verification.
//!
//! The identity service is the sole authority on who a caller is. Every
//! request is verified independently; nothing here caches tokens or holds a
//! "current user".

mod jwt;
mod remote;

pub use jwt::{Claims, JwtVerifier};
pub use remote::RemoteVerifier;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AuthConfig, ConfigError};

/// Verified caller, attached to the request once the token checks out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl Identity {
    /// Builds an identity from provider fields, falling back to the email
    /// when the provider has no display name.
    pub fn new(id: impl Into<String>, email: Option<String>, name: Option<String>) -> Self {
        let email = email.unwrap_or_default();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone());
        Self {
            id: id.into(),
            email,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("No token provided")]
    Missing,

    #[error("Invalid or expired token")]
    Invalid,

    #[error("identity service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Missing)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::Missing),
    }
}

/// Picks the verification strategy from configuration. A shared secret takes
/// precedence over the remote endpoint.
pub fn verifier_from_config(config: &AuthConfig) -> Result<Arc<dyn IdentityVerifier>, ConfigError> {
    if let Some(secret) = config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
        tracing::info!("Verifying bearer tokens locally (HS256)");
        return Ok(Arc::new(JwtVerifier::new(secret, config.jwt_audience.clone())));
    }

    match (&config.identity_url, &config.anon_key) {
        (Some(url), Some(anon_key)) => {
            let verifier = RemoteVerifier::new(
                url,
                anon_key.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?;
            tracing::info!("Verifying bearer tokens against {}", url);
            Ok(Arc::new(verifier))
        }
        _ => Err(ConfigError::MissingIdentity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Ok("abc.def"));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::Missing));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), Err(AuthError::Missing));
        assert_eq!(bearer_token(&headers("Bearer ")), Err(AuthError::Missing));
        assert_eq!(bearer_token(&headers("bearer abc")), Err(AuthError::Missing));
    }

    #[test]
    fn identity_name_falls_back_to_email() {
        let identity = Identity::new("u1", Some("a@b.co".into()), None);
        assert_eq!(identity.name, "a@b.co");

        let identity = Identity::new("u1", Some("a@b.co".into()), Some("  ".into()));
        assert_eq!(identity.name, "a@b.co");

        let identity = Identity::new("u1", None, Some("Ann".into()));
        assert_eq!(identity.email, "");
        assert_eq!(identity.name, "Ann");
    }

    #[test]
    fn config_selects_a_strategy() {
        let mut config = AuthConfig::default();
        assert!(verifier_from_config(&config).is_err());

        config.identity_url = Some("https://id.example.com".into());
        config.anon_key = Some("anon".into());
        assert!(verifier_from_config(&config).is_ok());

        config.identity_url = Some("not a url".into());
        assert!(matches!(
            verifier_from_config(&config),
            Err(ConfigError::InvalidIdentityUrl(_))
        ));

        config.jwt_secret = Some("secret".into());
        assert!(verifier_from_config(&config).is_ok());
    }
}
