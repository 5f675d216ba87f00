use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use billing::TokenCredential;

use crate::activity::Activity;

/// Audience Bot Connector tokens are scoped to.
pub const BOT_FRAMEWORK_AUDIENCE: &str = "https://api.botframework.com";

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token acquisition failed: {0}")]
    Token(#[from] billing::BillingError),
    #[error("inbound activity is missing {0}")]
    MissingField(&'static str),
    #[error("connector returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Sends reply activities back through the channel's service URL.
///
/// Replies never travel in the inbound HTTP response body; each one is its
/// own POST to the conversation's activities endpoint.
#[derive(Clone)]
pub struct ConnectorClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
}

impl ConnectorClient {
    pub fn new(credential: Arc<dyn TokenCredential>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("build http client"),
            credential,
        }
    }

    pub async fn send_reply(&self, inbound: &Activity, text: &str) -> Result<(), ConnectorError> {
        let service_url = inbound
            .service_url
            .as_deref()
            .ok_or(ConnectorError::MissingField("serviceUrl"))?;
        let conversation = inbound
            .conversation
            .as_ref()
            .ok_or(ConnectorError::MissingField("conversation"))?;

        // Channel-issued ids are opaque and may contain path metacharacters.
        let mut url = format!(
            "{}/v3/conversations/{}/activities",
            service_url.trim_end_matches('/'),
            urlencoding::encode(&conversation.id)
        );
        if let Some(reply_to) = inbound.id.as_deref() {
            url.push('/');
            url.push_str(&urlencoding::encode(reply_to));
        }

        let token = self.credential.get_token(BOT_FRAMEWORK_AUDIENCE).await?;
        debug!(%url, "sending reply activity");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token.token)
            .json(&inbound.reply_with(text))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
