use thiserror::Error;

/// Process-wide configuration, read once at startup and immutable afterward.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_endpoint_url: String,
    pub openai_engine: String,
    pub openai_max_tokens: u32,
    pub microsoft_app_id: String,
    pub microsoft_app_password: String,
    pub subscription_id: String,
    pub azure_tenant_id: String,
    pub azure_client_id: String,
    pub azure_client_secret: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),
    #[error("{name} must be a positive integer, got {value:?}")]
    BadNumber { name: String, value: String },
}

impl AppConfig {
    /// Load configuration from the environment. Every required variable must
    /// be present and non-empty; all missing names are reported together so a
    /// misconfigured deployment fails once, at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |name: &str| match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let openai_api_key = require("OPENAI_API_KEY");
        let openai_endpoint_url = require("OPENAI_ENDPOINT_URL");
        let microsoft_app_id = require("MicrosoftAppId");
        let microsoft_app_password = require("MicrosoftAppPassword");
        let subscription_id = require("SUBSCRIPTION_ID");
        let azure_tenant_id = require("AZURE_TENANT_ID");
        let azure_client_id = require("AZURE_CLIENT_ID");
        let azure_client_secret = require("AZURE_CLIENT_SECRET");

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let openai_engine = std::env::var("OPENAI_ENGINE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| completion::DEFAULT_ENGINE.to_string());
        let openai_max_tokens = match std::env::var("OPENAI_MAX_TOKENS") {
            Ok(value) => value.trim().parse().map_err(|_| ConfigError::BadNumber {
                name: "OPENAI_MAX_TOKENS".to_string(),
                value,
            })?,
            Err(_) => completion::DEFAULT_MAX_TOKENS,
        };

        Ok(Self {
            openai_api_key,
            openai_endpoint_url,
            openai_engine,
            openai_max_tokens,
            microsoft_app_id,
            microsoft_app_password,
            subscription_id,
            azure_tenant_id,
            azure_client_id,
            azure_client_secret,
        })
    }
}
