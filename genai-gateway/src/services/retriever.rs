//! Document retrieval against a search index.

use super::providers::ProviderError;
use async_trait::async_trait;
use aws_sdk_kendra::error::DisplayErrorContext;
use aws_sdk_kendra::types::{AttributeFilter, DocumentAttribute, DocumentAttributeValue};
use aws_sdk_kendra::Client;
use std::sync::Arc;

/// Upper bound on excerpts handed to the prompt.
pub const MAX_EXCERPTS: usize = 5;

/// Language every query is scoped to.
pub const RETRIEVAL_LANGUAGE: &str = "ja";

const LANGUAGE_ATTRIBUTE: &str = "_language_code";

/// One ranked result item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub excerpt: Option<String>,
}

impl SearchHit {
    pub fn with_excerpt(text: impl Into<String>) -> Self {
        Self {
            excerpt: Some(text.into()),
        }
    }
}

/// Search service seam.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one query and return hits in relevance order.
    async fn query(
        &self,
        text: &str,
        index_id: &str,
        language: &str,
    ) -> Result<Vec<SearchHit>, ProviderError>;
}

/// Amazon Kendra search client.
#[derive(Clone)]
pub struct KendraSearchClient {
    client: Client,
}

impl KendraSearchClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchClient for KendraSearchClient {
    async fn query(
        &self,
        text: &str,
        index_id: &str,
        language: &str,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let language_filter = DocumentAttribute::builder()
            .key(LANGUAGE_ATTRIBUTE)
            .value(
                DocumentAttributeValue::builder()
                    .string_value(language)
                    .build(),
            )
            .build()
            .map_err(|e| ProviderError::ApiError(format!("invalid language filter: {}", e)))?;

        let output = self
            .client
            .query()
            .index_id(index_id)
            .query_text(text)
            .attribute_filter(AttributeFilter::builder().equals_to(language_filter).build())
            .send()
            .await
            .map_err(|e| {
                ProviderError::ApiError(format!(
                    "Kendra query failed for index {}: {}",
                    index_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(output
            .result_items()
            .iter()
            .map(|item| SearchHit {
                excerpt: item
                    .document_excerpt()
                    .and_then(|excerpt| excerpt.text())
                    .map(str::to_owned),
            })
            .collect())
    }
}

/// Turns a question into at most [`MAX_EXCERPTS`] cleaned excerpt strings.
#[derive(Clone)]
pub struct Retriever {
    client: Arc<dyn SearchClient>,
    index_id: String,
    language: String,
}

impl Retriever {
    pub fn new(client: Arc<dyn SearchClient>, index_id: impl Into<String>) -> Self {
        Self {
            client,
            index_id: index_id.into(),
            language: RETRIEVAL_LANGUAGE.to_string(),
        }
    }

    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        let hits = self
            .client
            .query(query, &self.index_id, &self.language)
            .await?;

        let excerpts: Vec<String> = hits
            .into_iter()
            .take(MAX_EXCERPTS)
            .map(|hit| clean_excerpt(hit.excerpt.as_deref().unwrap_or_default()))
            .collect();

        tracing::debug!(
            index_id = %self.index_id,
            count = excerpts.len(),
            excerpts = ?excerpts,
            "Received search results"
        );

        Ok(excerpts)
    }
}

/// Replace literal `\n` escape sequences (backslash, `n`) with a space.
pub fn clean_excerpt(text: &str) -> String {
    text.replace("\\n", " ")
}
