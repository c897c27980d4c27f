//! Retrieval-augmented completion: search, compose, generate.

use super::prompt::rag_prompt;
use super::providers::{CompletionClient, ProviderError};
use super::retriever::Retriever;

#[derive(Clone)]
pub struct RagService {
    retriever: Retriever,
    client: CompletionClient,
}

impl RagService {
    pub fn new(retriever: Retriever, client: CompletionClient) -> Self {
        Self { retriever, client }
    }

    pub async fn answer(&self, question: &str) -> Result<Option<String>, ProviderError> {
        let excerpts = self.retriever.retrieve(question).await?;
        let prompt = rag_prompt(question, &excerpts);

        tracing::debug!(
            index_id = %self.retriever.index_id(),
            model = %self.client.model_id(),
            excerpts = excerpts.len(),
            "Composed retrieval prompt"
        );

        self.client.complete(&prompt).await
    }
}
