//! Image generation: a text model writes a Stable Diffusion prompt, the image
//! model renders it, and the PNG is published to object storage.

use super::prompt;
use super::providers::{CompletionClient, ModelFamily, ModelInvoker, ProviderError};
use super::storage::{public_url, ObjectStore};
use base64::Engine;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Output budget for the prompt-writing call.
pub const IMAGE_PROMPT_MAX_TOKENS: u32 = 500;

const CFG_SCALE: u32 = 10;
const SEED: u32 = 20;
const STEPS: u32 = 50;

/// Positive and negative prompt for the image model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePrompt {
    pub prompt: String,
    pub negative_prompt: String,
}

/// Asks a text model to turn a free-form request into an [`ImagePrompt`].
#[derive(Clone)]
pub struct ImagePromptWriter {
    client: CompletionClient,
}

impl ImagePromptWriter {
    /// The model family follows the identifier's prefix; only the output
    /// budget is fixed.
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        model_id: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let model_id = model_id.into();
        let family = ModelFamily::for_model(&model_id)?.with_max_tokens(IMAGE_PROMPT_MAX_TOKENS);
        Ok(Self {
            client: CompletionClient::with_family(invoker, model_id, family),
        })
    }

    pub async fn write(&self, request: &str) -> Result<ImagePrompt, ProviderError> {
        let completion = self
            .client
            .complete(&prompt::image_prompt(request))
            .await?
            .ok_or_else(|| {
                ProviderError::InvalidResponse("prompt model returned no completion".to_string())
            })?;

        serde_json::from_str(completion.trim()).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "prompt model did not return an image prompt object: {}",
                e
            ))
        })
    }
}

#[derive(Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
    weight: f64,
}

#[derive(Serialize)]
struct StableDiffusionRequest<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    cfg_scale: u32,
    seed: u32,
    steps: u32,
}

#[derive(Deserialize)]
struct StableDiffusionResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Deserialize)]
struct Artifact {
    #[serde(default)]
    base64: Option<String>,
}

/// Stable Diffusion XL renderer.
#[derive(Clone)]
pub struct ImageClient {
    invoker: Arc<dyn ModelInvoker>,
    model_id: String,
}

impl ImageClient {
    pub fn new(invoker: Arc<dyn ModelInvoker>, model_id: impl Into<String>) -> Self {
        Self {
            invoker,
            model_id: model_id.into(),
        }
    }

    /// Render the prompt and return the decoded PNG bytes of the first artifact.
    pub async fn render(&self, image_prompt: &ImagePrompt) -> Result<Vec<u8>, ProviderError> {
        let request = StableDiffusionRequest {
            text_prompts: vec![
                TextPrompt {
                    text: &image_prompt.prompt,
                    weight: 1.0,
                },
                TextPrompt {
                    text: &image_prompt.negative_prompt,
                    weight: -1.0,
                },
            ],
            cfg_scale: CFG_SCALE,
            seed: SEED,
            steps: STEPS,
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to encode request: {}", e)))?;

        let raw = self.invoker.invoke(&self.model_id, body).await?;
        let response: StableDiffusionResponse = serde_json::from_slice(&raw).map_err(|e| {
            ProviderError::InvalidResponse(format!("image model returned invalid body: {}", e))
        })?;

        tracing::info!(
            model = %self.model_id,
            result = response.result.as_deref().unwrap_or("unknown"),
            artifacts = response.artifacts.len(),
            "Image model finished"
        );

        let encoded = response
            .artifacts
            .into_iter()
            .next()
            .and_then(|artifact| artifact.base64)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("image model returned no artifact".to_string())
            })?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| ProviderError::InvalidResponse(format!("artifact is not base64: {}", e)))
    }
}

/// Object key for an image generated at `at`: `output-YYMMDD-HHMMSSff.png`,
/// `ff` being hundredths of a second.
pub fn object_key(at: DateTime<Utc>) -> String {
    let hundredths = (at.nanosecond() / 10_000_000).min(99);
    format!("output-{}{:02}.png", at.format("%y%m%d-%H%M%S"), hundredths)
}

/// The whole image flow, from request text to public URL.
#[derive(Clone)]
pub struct ImageService {
    writer: ImagePromptWriter,
    images: ImageClient,
    store: Arc<dyn ObjectStore>,
}

impl ImageService {
    pub fn new(writer: ImagePromptWriter, images: ImageClient, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            writer,
            images,
            store,
        }
    }

    pub async fn generate(&self, request: &str) -> Result<String, ProviderError> {
        self.generate_at(request, Utc::now()).await
    }

    pub async fn generate_at(
        &self,
        request: &str,
        at: DateTime<Utc>,
    ) -> Result<String, ProviderError> {
        let image_prompt = self.writer.write(request).await?;
        tracing::debug!(
            prompt = %image_prompt.prompt,
            negative_prompt = %image_prompt.negative_prompt,
            "Image prompt written"
        );

        let png = self.images.render(&image_prompt).await?;

        let key = object_key(at);
        self.store.put(&key, png, IMAGE_CONTENT_TYPE).await?;

        let url = public_url(self.store.bucket(), &key);
        tracing::info!(key = %key, url = %url, "Image stored");
        Ok(url)
    }
}
