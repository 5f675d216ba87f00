use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::errors::HttpError;

/// Gate inbound activities on a bearer `Authorization` header.
///
/// Full connector JWT validation belongs to the identity platform; the
/// transport boundary here only refuses unauthenticated calls outright.
pub async fn require_bearer(req: Request<Body>, next: Next) -> Result<Response, HttpError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match token {
        Some(token) if !token.trim().is_empty() => Ok(next.run(req).await),
        _ => Err(HttpError::new(
            StatusCode::UNAUTHORIZED,
            "missing or invalid Authorization header",
        )),
    }
}
