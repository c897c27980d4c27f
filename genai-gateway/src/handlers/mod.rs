//! Request handlers.
//!
//! Every handler runs the same steps: check the caller, read the prompt from
//! the body, hand it to its service and wrap the result in the response
//! envelope. Only the service differs.

pub mod http;

use crate::auth::Authorizer;
use crate::models::{HandlerResponse, InboundEvent};
use crate::services::{CompletionClient, ImageService, RagService};
use async_trait::async_trait;
use serde::Deserialize;
use service_core::error::AppError;
use std::fmt;
use std::sync::Arc;

/// What a handler does with an authorized prompt.
#[async_trait]
pub trait PromptService: Send + Sync {
    async fn respond(&self, prompt: &str) -> Result<Option<String>, AppError>;
}

#[async_trait]
impl PromptService for CompletionClient {
    async fn respond(&self, prompt: &str) -> Result<Option<String>, AppError> {
        Ok(self.complete(prompt).await?)
    }
}

#[async_trait]
impl PromptService for RagService {
    async fn respond(&self, prompt: &str) -> Result<Option<String>, AppError> {
        Ok(self.answer(prompt).await?)
    }
}

#[async_trait]
impl PromptService for ImageService {
    async fn respond(&self, prompt: &str) -> Result<Option<String>, AppError> {
        Ok(Some(self.generate(prompt).await?))
    }
}

/// The available handlers, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    Claude,
    Llama,
    Kendra,
    Image,
}

impl HandlerKind {
    pub const ALL: [HandlerKind; 4] = [
        HandlerKind::Claude,
        HandlerKind::Llama,
        HandlerKind::Kendra,
        HandlerKind::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Claude => "claude",
            HandlerKind::Llama => "llama",
            HandlerKind::Kendra => "kendra",
            HandlerKind::Image => "image",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Handler {
    kind: HandlerKind,
    authorizer: Authorizer,
    service: Arc<dyn PromptService>,
}

impl Handler {
    pub fn new(kind: HandlerKind, authorizer: Authorizer, service: Arc<dyn PromptService>) -> Self {
        Self {
            kind,
            authorizer,
            service,
        }
    }

    pub async fn handle(&self, event: &InboundEvent) -> Result<HandlerResponse, AppError> {
        if let Err(rejection) = self.authorizer.check(event) {
            tracing::warn!(handler = %self.kind, reason = %rejection, "Rejected caller");
            return Ok(HandlerResponse::unauthorized());
        }

        tracing::debug!(handler = %self.kind, event = ?event, "Received event");

        let request = event.prompt_request()?;
        let completion = self.service.respond(&request.user_prompt).await?;

        let response = HandlerResponse::completion(completion);
        tracing::info!(handler = %self.kind, response = ?response, "Request handled");
        Ok(response)
    }
}

/// One handler per [`HandlerKind`].
#[derive(Clone)]
pub struct Handlers {
    pub claude: Arc<Handler>,
    pub llama: Arc<Handler>,
    pub kendra: Arc<Handler>,
    pub image: Arc<Handler>,
}

impl Handlers {
    pub fn get(&self, kind: HandlerKind) -> &Handler {
        match kind {
            HandlerKind::Claude => &self.claude,
            HandlerKind::Llama => &self.llama,
            HandlerKind::Kendra => &self.kendra,
            HandlerKind::Image => &self.image,
        }
    }
}
