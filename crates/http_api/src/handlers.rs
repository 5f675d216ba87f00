use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use costbot_app::welcome_reply;

use crate::{activity::Activity, errors::HttpError, state::HttpState};

/// `POST /api/messages` — one activity per call, dispatched by type.
///
/// Replies are pushed through the connector; the HTTP response only
/// acknowledges receipt.
pub async fn messages(
    State(state): State<HttpState>,
    Json(activity): Json<Activity>,
) -> Result<impl IntoResponse, HttpError> {
    match activity.activity_type.as_str() {
        "message" => {
            let text = activity.text.as_deref().unwrap_or_default();
            let reply = state.app.services.conversation.handle_message(text).await;
            state.connector.send_reply(&activity, &reply).await?;
        }
        "conversationUpdate" => {
            let bot_id = activity
                .recipient
                .as_ref()
                .map(|account| account.id.as_str())
                .unwrap_or_default();
            for member in &activity.members_added {
                if let Some(text) = welcome_reply(&member.id, bot_id) {
                    state.connector.send_reply(&activity, text).await?;
                }
            }
        }
        other => {
            debug!(activity_type = other, "ignoring activity");
        }
    }
    Ok(StatusCode::ACCEPTED)
}
