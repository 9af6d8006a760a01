//! Request body extraction for free-form JSON payloads
//!
//! Browsers post to the relay with whatever content type they like. Only a
//! non-empty body declared as JSON is parsed; anything else (no body, an
//! empty body, `text/plain`, form data) becomes an empty payload. A body
//! that claims to be JSON but is not a JSON object is rejected with 400.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use shared::ActionPayload;

/// JSON object body, or an empty object when the request carries no JSON
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObject(pub ActionPayload);

#[derive(Debug)]
pub enum PayloadRejection {
    /// The body could not be read
    Body(BytesRejection),
    /// The body was declared as JSON but is not a JSON object
    Malformed(serde_json::Error),
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        match self {
            PayloadRejection::Body(rejection) => {
                warn!("Failed to read request body: {}", rejection);
                rejection.into_response()
            }
            PayloadRejection::Malformed(e) => {
                warn!("Rejected malformed JSON body: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        }
    }
}

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let declared_json = has_json_content_type(req.headers());
        let body = Bytes::from_request(req, state)
            .await
            .map_err(PayloadRejection::Body)?;

        if !declared_json || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonObject(ActionPayload::new()));
        }

        serde_json::from_slice(&body)
            .map(JsonObject)
            .map_err(PayloadRejection::Malformed)
    }
}

/// True for `application/json` and `application/*+json`, parameters ignored
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
