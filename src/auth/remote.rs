use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{AuthError, Identity, IdentityVerifier};
use crate::config::ConfigError;

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<RemoteMetadata>,
}

#[derive(Debug, Deserialize)]
struct RemoteMetadata {
    name: Option<String>,
}

/// Resolves tokens by asking the identity service who they belong to
/// (`GET {base}/auth/v1/user`).
pub struct RemoteVerifier {
    client: reqwest::Client,
    endpoint: Url,
    anon_key: String,
}

impl RemoteVerifier {
    pub fn new(base_url: &str, anon_key: String, timeout: Duration) -> Result<Self, ConfigError> {
        let endpoint =
            user_endpoint(base_url).map_err(|_| ConfigError::InvalidIdentityUrl(base_url.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            anon_key,
        })
    }
}

/// `{base}/auth/v1/user`, keeping any path prefix on the base URL
fn user_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("auth/v1/user")
}

#[async_trait]
impl IdentityVerifier for RemoteVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity service request failed: {}", e);
                AuthError::ServiceUnavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::error!("Identity service responded with {}", status);
            return Err(AuthError::ServiceUnavailable(format!("identity service responded with {}", status)));
        }
        if !status.is_success() {
            tracing::debug!("Identity service rejected token with {}", status);
            return Err(AuthError::Invalid);
        }

        let user: RemoteUser = response.json().await.map_err(|e| {
            tracing::error!("Unexpected identity service payload: {}", e);
            AuthError::ServiceUnavailable(e.to_string())
        })?;

        Ok(Identity::new(
            user.id,
            user.email,
            user.user_metadata.and_then(|m| m.name),
        ))
    }
}
