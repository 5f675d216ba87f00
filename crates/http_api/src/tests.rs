use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use billing::{CostClient, StaticCredential};
use completion::CompletionClient;
use costbot_app::{
    AppConfig, AppState, ConversationService,
    services::conversation::{COST_FAILURE_TEXT, GUIDANCE_TEXT, SUMMARY_FAILURE_TEXT, WELCOME_TEXT},
};

use crate::{ConnectorClient, HttpState};

const BILLING_QUERY_PATH: &str = "/subscriptions/sub-123/providers/Microsoft.CostManagement/query";

fn test_config() -> AppConfig {
    AppConfig {
        openai_api_key: "sk-test".to_string(),
        openai_endpoint_url: "http://unused.invalid".to_string(),
        openai_engine: "davinci-codex".to_string(),
        openai_max_tokens: 150,
        microsoft_app_id: "app-id".to_string(),
        microsoft_app_password: "app-secret".to_string(),
        subscription_id: "sub-123".to_string(),
        azure_tenant_id: "tenant".to_string(),
        azure_client_id: "client".to_string(),
        azure_client_secret: "secret".to_string(),
    }
}

fn state_for(billing_server: &MockServer, openai_server: &MockServer) -> HttpState {
    let costs = CostClient::new(StaticCredential::new("mgmt-token"), "sub-123")
        .with_base_url(billing_server.uri());
    let summarizer = CompletionClient::new(openai_server.uri(), "sk-test");
    let conversation = ConversationService::new(Arc::new(costs), Arc::new(summarizer));
    let app = AppState::with_conversation(test_config(), conversation);
    HttpState::new(app, ConnectorClient::new(StaticCredential::new("bot-token")))
}

fn message_activity(service_url: &str, text: &str) -> serde_json::Value {
    json!({
        "type": "message",
        "id": "act-1",
        "text": text,
        "from": { "id": "user-1", "name": "Pat" },
        "recipient": { "id": "bot-1" },
        "conversation": { "id": "conv-1" },
        "serviceUrl": service_url,
        "channelId": "msteams"
    })
}

fn post_messages(activity: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("authorization", "Bearer channel-token")
        .header("content-type", "application/json")
        .body(Body::from(activity.to_string()))
        .expect("request")
}

async fn mount_reply_expectation(connector: &MockServer, contains: &str) {
    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities/act-1"))
        .and(header("authorization", "Bearer bot-token"))
        .and(body_string_contains(contains))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "reply-1" })))
        .expect(1)
        .mount(connector)
        .await;
}

#[tokio::test]
async fn message_turn_replies_with_summary() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BILLING_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": { "rows": [[12.5, "2024-01-05", "rg-prod"]] }
        })))
        .expect(1)
        .mount(&billing_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_string_contains("rg-prod"))
        .and(body_string_contains("12.50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "text": "Production spent $12.50 on Jan 5." }]
        })))
        .expect(1)
        .mount(&openai_server)
        .await;
    mount_reply_expectation(&connector_server, "Production spent $12.50 on Jan 5.").await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let activity = message_activity(&connector_server.uri(), "2024-01-01 to 2024-01-31");
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn reply_url_escapes_channel_issued_ids() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BILLING_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": { "rows": [] }
        })))
        .mount(&billing_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "text": "No costs in this period." }]
        })))
        .mount(&openai_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/conversations/team%2Fgeneral%3Fthread%3D7/activities/act%2F1"))
        .and(header("authorization", "Bearer bot-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "reply-1" })))
        .expect(1)
        .mount(&connector_server)
        .await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let mut activity = message_activity(&connector_server.uri(), "2024-01-01 to 2024-01-31");
    activity["conversation"]["id"] = json!("team/general?thread=7");
    activity["id"] = json!("act/1");
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn malformed_range_gets_guidance_and_no_billing_call() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BILLING_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&billing_server)
        .await;
    mount_reply_expectation(&connector_server, GUIDANCE_TEXT).await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let activity = message_activity(&connector_server.uri(), "not-a-date");
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn billing_403_turns_into_generic_failure_reply() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BILLING_QUERY_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&billing_server)
        .await;
    mount_reply_expectation(&connector_server, COST_FAILURE_TEXT).await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let activity = message_activity(&connector_server.uri(), "2024-01-01 to 2024-01-31");
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn empty_choices_turns_into_generic_summary_reply() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BILLING_QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "properties": { "rows": [] } })),
        )
        .mount(&billing_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&openai_server)
        .await;
    mount_reply_expectation(&connector_server, SUMMARY_FAILURE_TEXT).await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let activity = message_activity(&connector_server.uri(), "2024-01-01 to 2024-01-31");
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn member_joined_welcomes_humans_but_not_the_bot() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities/act-1"))
        .and(body_string_contains(WELCOME_TEXT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "reply-1" })))
        .expect(1)
        .mount(&connector_server)
        .await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let activity = json!({
        "type": "conversationUpdate",
        "id": "act-1",
        "membersAdded": [{ "id": "user-1" }, { "id": "bot-1" }],
        "recipient": { "id": "bot-1" },
        "conversation": { "id": "conv-1" },
        "serviceUrl": connector_server.uri()
    });
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn unknown_activity_type_is_acknowledged_and_ignored() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let connector_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&connector_server)
        .await;

    let app = crate::router(state_for(&billing_server, &openai_server));
    let activity = json!({ "type": "typing", "serviceUrl": connector_server.uri() });
    let response = app.oneshot(post_messages(&activity)).await.expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn missing_bearer_header_is_unauthorized() {
    let billing_server = MockServer::start().await;
    let openai_server = MockServer::start().await;
    let app = crate::router(state_for(&billing_server, &openai_server));

    let request = Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "type": "message", "text": "hi" }).to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
