//! OAuth2 client-credentials flow against the Azure AD token endpoint.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::AzureAdConfig;
use crate::services::error::ServiceError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True when the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Caches the app-only access token for the directory API.
///
/// Construction performs no network call; the credential is only proven on
/// first use. Refresh is double-checked under the write lock, so concurrent
/// first requests acquire exactly one token.
#[derive(Debug)]
pub struct TokenCache {
    config: AzureAdConfig,
    http_client: reqwest::Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// Refresh this long before actual expiry.
    grace_period: Duration,
}

impl TokenCache {
    pub fn new(config: AzureAdConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
            grace_period: Duration::minutes(5),
        }
    }

    /// Gets a valid access token, refreshing if necessary.
    pub async fn get_token(&self) -> Result<String, ServiceError> {
        {
            let cache = self.cached_token.read().await;
            if let Some(token) = cache.as_ref() {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cache = self.cached_token.write().await;
        if let Some(token) = cache.as_ref() {
            if !token.is_expired(self.grace_period) {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Refreshing directory access token");
        let token = self.acquire_token().await?;
        let access_token = token.access_token.clone();
        *cache = Some(token);
        Ok(access_token)
    }

    /// Acquires a new access token using the client-credentials grant.
    async fn acquire_token(&self) -> Result<CachedToken, ServiceError> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.login_base_url.trim_end_matches('/'),
            self.config.tenant_id
        );

        let scope = self.config.graph_scope();
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Auth(format!("Failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!(%expires_at, "Acquired new directory access token");

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
