//! HTTP adapter: turns an axum request into an [`InboundEvent`] and the
//! handler result into a response.

use super::HandlerKind;
use crate::models::{HandlerResponse, InboundEvent};
use crate::startup::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use service_core::error::AppError;

pub async fn invoke(
    State(state): State<AppState>,
    Path(kind): Path<HandlerKind>,
    headers: HeaderMap,
    body: String,
) -> Result<HandlerResponse, AppError> {
    let event = event_from_request(&headers, body);
    state.handlers.get(kind).handle(&event).await
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "genai-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Header values that are not valid UTF-8 are dropped; repeated headers keep
/// the last value.
pub fn event_from_request(headers: &HeaderMap, body: String) -> InboundEvent {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = if body.is_empty() { None } else { Some(body) };
    InboundEvent::new(headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::USER_AGENT;

    #[test]
    fn builds_event_from_headers_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, "AppsheetBot".parse().unwrap());

        let event = event_from_request(&headers, r#"{"user_prompt": "hi"}"#.to_string());

        assert_eq!(event.header("User-Agent"), Some("AppsheetBot"));
        assert_eq!(event.prompt_request().unwrap().user_prompt, "hi");
    }

    #[test]
    fn empty_body_is_absent() {
        let event = event_from_request(&HeaderMap::new(), String::new());
        assert!(event.body.is_none());
    }
}
