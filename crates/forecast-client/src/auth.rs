use dashboard_core::http::{join_url, read_error_detail};
use dashboard_core::{DashboardError, DashboardResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    username: Option<String>,
    message: Option<String>,
}

/// Client for `POST {base}/login` and `POST {base}/signup`.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: String, timeout: Duration) -> DashboardResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the authenticated username.
    pub async fn login(&self, username: &str, password: &str) -> DashboardResult<String> {
        let response = self.post_credentials("login", username, password).await?;
        Ok(response
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| username.to_string()))
    }

    pub async fn signup(&self, username: &str, password: &str) -> DashboardResult<()> {
        let response = self.post_credentials("signup", username, password).await?;
        if let Some(message) = response.message {
            tracing::info!("Signup for {}: {}", username, message);
        }
        Ok(())
    }

    async fn post_credentials(
        &self,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> DashboardResult<AuthResponse> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DashboardError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }

        let url = join_url(&self.base_url, &[endpoint]);
        tracing::debug!("POST {} for {}", url, username);

        let response = self
            .client
            .post(&url)
            .json(&Credentials { username, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = read_error_detail(response)
                .await
                .unwrap_or_else(|| "Authentication failed".to_string());
            return Err(DashboardError::Http { status, detail });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(AuthResponse::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}
