use std::sync::Arc;

use billing::{ClientSecretCredential, CostClient};
use completion::CompletionClient;

use crate::config::AppConfig;
use crate::services::{AppServices, ConversationService};

/// Application state shared by the transport layer. Configuration is loaded
/// once and read-only; no other state crosses turns.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: AppServices,
}

impl AppState {
    /// Wire the production clients from configuration.
    pub fn new(config: AppConfig) -> Self {
        let credential = ClientSecretCredential::new(
            config.azure_tenant_id.clone(),
            config.azure_client_id.clone(),
            config.azure_client_secret.clone(),
        );
        let costs = CostClient::new(credential, config.subscription_id.clone());
        let summarizer = CompletionClient::new(
            config.openai_endpoint_url.clone(),
            config.openai_api_key.clone(),
        )
        .with_engine(config.openai_engine.clone())
        .with_max_tokens(config.openai_max_tokens);

        let services = AppServices {
            conversation: ConversationService::new(Arc::new(costs), Arc::new(summarizer)),
        };
        Self {
            config: Arc::new(config),
            services,
        }
    }

    /// Build state around an externally wired conversation service.
    pub fn with_conversation(config: AppConfig, conversation: ConversationService) -> Self {
        Self {
            config: Arc::new(config),
            services: AppServices { conversation },
        }
    }
}
