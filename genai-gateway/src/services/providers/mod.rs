//! Hosted model providers.
//!
//! `ModelInvoker` is the raw invoke seam (Bedrock in production, a mock in
//! tests). `ModelFamily` knows how each model family shapes its request body
//! and where it puts the generated text. `CompletionClient` ties the two
//! together for one configured model identifier.

pub mod bedrock;

use async_trait::async_trait;
use serde::Serialize;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

pub use bedrock::BedrockInvoker;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

/// Invokes a hosted model with a JSON body and returns the raw JSON reply.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, ProviderError>;
}

/// Request shape and response field for one model family.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelFamily {
    /// Anthropic text models: `{prompt, max_tokens_to_sample}` in, `completion` out.
    Anthropic { max_tokens_to_sample: u32 },
    /// Meta Llama chat models: `{prompt, max_gen_len, top_p, temperature}` in,
    /// `generation` out.
    MetaLlama {
        max_gen_len: u32,
        top_p: f64,
        temperature: f64,
    },
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    prompt: &'a str,
    max_tokens_to_sample: u32,
}

#[derive(Serialize)]
struct LlamaRequest<'a> {
    prompt: &'a str,
    max_gen_len: u32,
    top_p: f64,
    temperature: f64,
}

impl ModelFamily {
    pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 600;

    pub fn anthropic(max_tokens_to_sample: u32) -> Self {
        ModelFamily::Anthropic {
            max_tokens_to_sample,
        }
    }

    pub fn meta_llama() -> Self {
        ModelFamily::MetaLlama {
            max_gen_len: 1024,
            top_p: 0.9,
            temperature: 0.2,
        }
    }

    /// Pick the family (with its default decoding parameters) from the
    /// provider prefix of a model identifier.
    pub fn for_model(model_id: &str) -> Result<Self, ProviderError> {
        match model_id.split('.').next() {
            Some("anthropic") => Ok(Self::anthropic(Self::DEFAULT_ANTHROPIC_MAX_TOKENS)),
            Some("meta") => Ok(Self::meta_llama()),
            _ => Err(ProviderError::NotConfigured(format!(
                "no text model family known for model id '{}'",
                model_id
            ))),
        }
    }

    /// Same family with a different output budget.
    pub fn with_max_tokens(self, max_tokens: u32) -> Self {
        match self {
            ModelFamily::Anthropic { .. } => Self::anthropic(max_tokens),
            ModelFamily::MetaLlama {
                top_p, temperature, ..
            } => ModelFamily::MetaLlama {
                max_gen_len: max_tokens,
                top_p,
                temperature,
            },
        }
    }

    pub fn request_body(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let body = match self {
            ModelFamily::Anthropic {
                max_tokens_to_sample,
            } => serde_json::to_vec(&AnthropicRequest {
                prompt,
                max_tokens_to_sample: *max_tokens_to_sample,
            }),
            ModelFamily::MetaLlama {
                max_gen_len,
                top_p,
                temperature,
            } => serde_json::to_vec(&LlamaRequest {
                prompt,
                max_gen_len: *max_gen_len,
                top_p: *top_p,
                temperature: *temperature,
            }),
        };
        body.map_err(|e| ProviderError::InvalidResponse(format!("failed to encode request: {}", e)))
    }

    pub fn response_field(&self) -> &'static str {
        match self {
            ModelFamily::Anthropic { .. } => "completion",
            ModelFamily::MetaLlama { .. } => "generation",
        }
    }

    /// Pull the generated text out of a decoded response body.
    pub fn extract_text(&self, response: &serde_json::Value) -> Option<String> {
        response
            .get(self.response_field())
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    }
}

/// Text generation against one configured model.
#[derive(Clone)]
pub struct CompletionClient {
    invoker: Arc<dyn ModelInvoker>,
    model_id: String,
    family: ModelFamily,
}

impl CompletionClient {
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        model_id: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let model_id = model_id.into();
        let family = ModelFamily::for_model(&model_id)?;
        Ok(Self::with_family(invoker, model_id, family))
    }

    pub fn with_family(
        invoker: Arc<dyn ModelInvoker>,
        model_id: impl Into<String>,
        family: ModelFamily,
    ) -> Self {
        Self {
            invoker,
            model_id: model_id.into(),
            family,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Generate text for `prompt`. `None` when the reply lacks the family's
    /// text field.
    pub async fn complete(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        let body = self.family.request_body(prompt)?;

        tracing::debug!(
            model = %self.model_id,
            prompt_len = prompt.len(),
            "Invoking text model"
        );

        let raw = self.invoker.invoke(&self.model_id, body).await?;
        let response: serde_json::Value = serde_json::from_slice(&raw).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "model {} returned non-JSON body: {}",
                self.model_id, e
            ))
        })?;

        tracing::debug!(model = %self.model_id, response_body = %response, "Received response body");

        let text = self.family.extract_text(&response);
        if text.is_none() {
            tracing::warn!(
                model = %self.model_id,
                field = self.family.response_field(),
                "Model response has no generated text"
            );
        }
        Ok(text)
    }
}
