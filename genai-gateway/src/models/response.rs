//! The fixed response envelope returned by every handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{statusCode, body}` where `body` is either `{completion}` or a plain
/// JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Completion { completion: Option<String> },
    Message(String),
}

impl HandlerResponse {
    pub fn completion(text: Option<String>) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Completion { completion: text },
        }
    }

    pub fn unauthorized() -> Self {
        // The body is the JSON encoding of the message, quotes included.
        let message = serde_json::Value::from("401 Unauthorized").to_string();
        Self {
            status_code: 401,
            body: ResponseBody::Message(message),
        }
    }

    pub fn completion_text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Completion { completion } => completion.as_deref(),
            ResponseBody::Message(_) => None,
        }
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
