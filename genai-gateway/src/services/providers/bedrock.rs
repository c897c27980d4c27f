//! Amazon Bedrock runtime invoker.

use super::{ModelInvoker, ProviderError, JSON_CONTENT_TYPE};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;

#[derive(Clone)]
pub struct BedrockInvoker {
    client: Client,
}

impl BedrockInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, ProviderError> {
        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                ProviderError::ApiError(format!(
                    "Bedrock InvokeModel failed for {}: {}",
                    model_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(output.body.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockruntime::config::{BehaviorVersion, Credentials, Region};
    use aws_smithy_http_client::test_util::capture_request;

    #[tokio::test]
    async fn invoke_sends_json_body_to_model_endpoint() {
        let (http_client, request) = capture_request(None);
        let config = aws_sdk_bedrockruntime::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("akid", "secret", None, None, "test"))
            .http_client(http_client)
            .build();
        let invoker = BedrockInvoker::new(Client::from_conf(config));
        let body = br#"{"prompt":"Hello","max_tokens_to_sample":600}"#.to_vec();

        let _ = invoker.invoke("anthropic.claude-v2", body.clone()).await;

        let sent = request.expect_request();
        assert!(sent.uri().contains("/model/anthropic.claude-v2/invoke"));
        assert_eq!(sent.headers().get("content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(sent.headers().get("accept"), Some(JSON_CONTENT_TYPE));
        assert_eq!(sent.body().bytes(), Some(body.as_slice()));
    }
}
