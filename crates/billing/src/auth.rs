use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::types::{BillingError, Result};

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Renew a cached token this long before its reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Short-lived credential for one API audience.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    fn is_current(&self) -> bool {
        self.expires_on - chrono::Duration::seconds(EXPIRY_MARGIN_SECS) > Utc::now()
    }
}

/// Narrow capability contract over the identity provider: a bearer token
/// scoped to one audience. Everything behind it is opaque to this system.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, audience: &str) -> Result<AccessToken>;
}

/// OAuth2 client-credentials grant against the Microsoft identity platform.
///
/// Tokens are cached per audience and renewed shortly before expiry.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    cache: Mutex<HashMap<String, AccessToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("build http client"),
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Point the credential at a different token endpoint host.
    pub fn with_authority(self: Arc<Self>, authority: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            http: self.http.clone(),
            authority: authority.into(),
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    async fn request_token(&self, audience: &str) -> Result<AccessToken> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        );
        let scope = format!("{}/.default", audience.trim_end_matches('/'));
        debug!(%url, %scope, "requesting access token");
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::Token {
                status: status.as_u16(),
                body,
            });
        }
        let payload: TokenResponse = response.json().await?;
        Ok(AccessToken {
            token: payload.access_token,
            expires_on: Utc::now() + chrono::Duration::seconds(payload.expires_in),
        })
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, audience: &str) -> Result<AccessToken> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.get(audience) {
            if token.is_current() {
                return Ok(token.clone());
            }
        }
        let token = self.request_token(audience).await?;
        cache.insert(audience.to_string(), token.clone());
        Ok(token)
    }
}

/// Credential wrapping a token obtained elsewhere. Used where the caller
/// already holds a bearer token, and by tests.
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            token: token.into(),
        })
    }
}

#[async_trait]
impl TokenCredential for StaticCredential {
    async fn get_token(&self, _audience: &str) -> Result<AccessToken> {
        Ok(AccessToken {
            token: self.token.clone(),
            expires_on: Utc::now() + chrono::Duration::hours(1),
        })
    }
}
