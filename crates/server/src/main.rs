use billing::ClientSecretCredential;
use costbot_app::{AppConfig, AppState};
use http_api::{ConnectorClient, HttpState};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Bot Framework identities live in the connector's own tenant.
const BOT_FRAMEWORK_TENANT: &str = "botframework.com";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let bot_credential = ClientSecretCredential::new(
        BOT_FRAMEWORK_TENANT,
        config.microsoft_app_id.clone(),
        config.microsoft_app_password.clone(),
    );
    let connector = ConnectorClient::new(bot_credential);
    let state = HttpState::new(AppState::new(config), connector);
    let app = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR)
        .await
        .expect("bind server");
    info!(addr = LISTEN_ADDR, "listening for activities");
    axum::serve(listener, app).await.expect("serve");
}
