#![allow(dead_code)]

pub mod db;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use reviewdesk_api::app::{router, AppState};
use reviewdesk_api::auth::{Identity, JwtVerifier};
use reviewdesk_api::config::AppConfig;
use reviewdesk_api::database::MemoryStore;

pub const SECRET: &str = "integration-test-secret";
pub const AUDIENCE: &str = "authenticated";

/// The real router served on a free port, backed by an in-process store and
/// local token verification. One per test, since each test owns its runtime.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    issuer: JwtVerifier,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;

        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(JwtVerifier::new(SECRET, Some(AUDIENCE.to_string()))),
        );
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        let app = router(state, &config);

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            issuer: JwtVerifier::new(SECRET, Some(AUDIENCE.to_string())),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A signed-in agent with a fresh id
    pub fn agent(&self, name: &str) -> Agent {
        self.agent_as(Identity::new(
            format!("{}-{}", name, uuid::Uuid::new_v4()),
            Some(format!("{}@agents.test", name)),
            Some(name.to_string()),
        ))
    }

    /// An agent signed in as exactly `identity`
    pub fn agent_as(&self, identity: Identity) -> Agent {
        let token = self
            .issuer
            .issue(&identity, chrono::Duration::hours(1))
            .expect("failed to sign test token");
        Agent {
            identity,
            token,
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }

    pub fn expired_token(&self, name: &str) -> String {
        let identity = Identity::new(name, Some(format!("{}@agents.test", name)), None);
        self.issuer
            .issue(&identity, chrono::Duration::hours(-2))
            .expect("failed to sign test token")
    }
}

pub struct Agent {
    pub identity: Identity,
    pub token: String,
    client: reqwest::Client,
    base_url: String,
}

impl Agent {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&self.token)
    }

    pub fn post(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&self.token).json(body)
    }

    pub fn put(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(&self.token).json(body)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(&self.token)
    }

    /// POST and expect 201, returning the created row
    pub async fn create(&self, path: &str, body: Value) -> Result<Value> {
        let res = self.post(path, &body).send().await?;
        let status = res.status();
        let json: Value = res.json().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "POST {} -> {}: {}", path, status, json);
        Ok(json)
    }

    pub async fn create_client(&self, name: &str) -> Result<Value> {
        self.create(
            "/api/clients",
            serde_json::json!({
                "name": name,
                "email": format!("{}@clients.test", name.to_lowercase().replace(' ', ".")),
                "clientType": "buyer",
                "propertyType": "condo"
            }),
        )
        .await
    }

    pub async fn create_request(&self, client_id: &str) -> Result<Value> {
        self.create(
            "/api/review-requests",
            serde_json::json!({
                "clientId": client_id,
                "message": "Would you share a few words about working with me?"
            }),
        )
        .await
    }

    pub async fn create_testimonial(&self, client_id: &str, rating: i64) -> Result<Value> {
        self.create(
            "/api/testimonials",
            serde_json::json!({
                "clientId": client_id,
                "content": "Made buying our first home painless.",
                "rating": rating
            }),
        )
        .await
    }
}

pub fn id_of(row: &Value) -> String {
    row["id"].as_str().expect("row without id").to_string()
}
