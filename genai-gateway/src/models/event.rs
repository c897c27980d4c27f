//! Inbound request shapes.

use serde::{Deserialize, Deserializer};
use service_core::error::AppError;
use std::collections::HashMap;

/// An HTTP-like invocation: a header map and an optional raw body.
///
/// Header names are stored lowercase so lookups are case-insensitive,
/// whether the event came from an HTTP request or a JSON event document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundEvent {
    #[serde(default, deserialize_with = "lowercase_keys")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl InboundEvent {
    pub fn new(headers: HashMap<String, String>, body: Option<String>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self { headers, body }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parse the JSON body into the prompt request.
    pub fn prompt_request(&self) -> Result<PromptRequest, AppError> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("request body is missing")))?;

        serde_json::from_str(body).map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("request body has no usable user_prompt: {}", e))
        })
    }
}

fn lowercase_keys<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect())
}

/// JSON request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRequest {
    pub user_prompt: String,
}
