//! Shared test helpers for turn-pipeline tests.

use async_trait::async_trait;
use std::sync::Mutex;
use stockchat_core::error::{ProviderError, RetrievalError};
use stockchat_core::provider::{Provider, ProviderRequest, ProviderResponse};
use stockchat_core::schema::{ContextRetriever, SchemaDoc};

/// A mock provider that returns a sequence of scripted raw texts.
///
/// Each call to `complete` returns the next text in the queue and records
/// the prompt it was given. Panics if more calls are made than texts
/// provided.
pub struct ScriptedProvider {
    responses: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
    last_prompt: Mutex<Option<String>>,
    fail: bool,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            last_prompt: Mutex::new(None),
            fail: false,
        }
    }

    /// A provider that returns a single raw text.
    pub fn single(text: &str) -> Self {
        Self::new(vec![text.to_string()])
    }

    /// A provider whose every call fails with a network error.
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(vec![]),
            call_count: Mutex::new(0),
            last_prompt: Mutex::new(None),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The prompt from the most recent `complete` call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        if self.fail {
            return Err(ProviderError::Network("scripted failure".into()));
        }

        *self.last_prompt.lock().unwrap() = Some(request.prompt);

        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if *count >= responses.len() {
            panic!(
                "ScriptedProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }
        let text = responses[*count].clone();
        *count += 1;

        Ok(ProviderResponse {
            text,
            model: request.model,
            usage: None,
        })
    }
}

/// A retriever that returns nothing.
pub struct NullRetriever;

#[async_trait]
impl ContextRetriever for NullRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<SchemaDoc>, RetrievalError> {
        Ok(vec![])
    }
}

/// A retriever that always fails.
pub struct FailingRetriever;

#[async_trait]
impl ContextRetriever for FailingRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<SchemaDoc>, RetrievalError> {
        Err(RetrievalError::QueryFailed("scripted failure".into()))
    }
}

/// A retriever that returns one fixed document.
pub struct StaticRetriever {
    content: String,
}

impl StaticRetriever {
    pub fn with_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<SchemaDoc>, RetrievalError> {
        Ok(vec![SchemaDoc::new("static", "table", &self.content)])
    }
}
