mod activity;
mod connector;
mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{Router, middleware as axum_middleware, routing::post};

pub use activity::{Activity, ChannelAccount, ConversationAccount};
pub use connector::{ConnectorClient, ConnectorError};
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    Router::new()
        .route("/api/messages", post(handlers::messages))
        .route_layer(axum_middleware::from_fn(middleware::require_bearer))
        .with_state(state)
}

#[cfg(test)]
mod tests;
