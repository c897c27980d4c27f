//! In-process doubles for the managed services, used by tests.

use super::providers::{ModelInvoker, ProviderError};
use super::retriever::{SearchClient, SearchHit};
use super::storage::ObjectStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A recorded model invocation.
#[derive(Debug, Clone)]
pub struct InvokeCall {
    pub model_id: String,
    pub body: serde_json::Value,
}

/// Model invoker answering with canned bodies per model id.
#[derive(Default)]
pub struct MockInvoker {
    replies: Mutex<HashMap<String, Result<Vec<u8>, String>>>,
    calls: Mutex<Vec<InvokeCall>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, model_id: &str, body: serde_json::Value) {
        self.respond_raw(model_id, body.to_string().into_bytes());
    }

    pub fn respond_raw(&self, model_id: &str, body: Vec<u8>) {
        self.replies
            .lock()
            .unwrap()
            .insert(model_id.to_string(), Ok(body));
    }

    pub fn fail_with(&self, model_id: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(model_id.to_string(), Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<InvokeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelInvoker for MockInvoker {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, ProviderError> {
        self.calls.lock().unwrap().push(InvokeCall {
            model_id: model_id.to_string(),
            body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
        });

        match self.replies.lock().unwrap().get(model_id) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(ProviderError::ApiError(message.clone())),
            None => Err(ProviderError::ApiError(format!(
                "no mock reply for model {}",
                model_id
            ))),
        }
    }
}

/// A recorded search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub index_id: String,
    pub language: String,
}

/// Search client returning a fixed hit list.
pub struct MockSearchClient {
    reply: Result<Vec<SearchHit>, String>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl MockSearchClient {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            reply: Ok(hits),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn query(
        &self,
        text: &str,
        index_id: &str,
        language: &str,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        self.queries.lock().unwrap().push(SearchQuery {
            text: text.to_string(),
            index_id: index_id.to_string(),
            language: language.to_string(),
        });

        self.reply.clone().map_err(ProviderError::ApiError)
    }
}

/// A recorded object upload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object store keeping uploads in memory.
pub struct MockObjectStore {
    bucket: String,
    objects: Mutex<Vec<StoredObject>>,
}

impl MockObjectStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ProviderError> {
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}
