//! ChatTurn — the per-turn pipeline.
//!
//! One user message flows through: retrieve schema context → build prompt →
//! call the model → interpret the raw response → dispatch the intent.
//! Exactly one Intent in, one display string out; nothing persists between
//! turns.

use crate::dispatcher::Dispatcher;
use crate::interpreter::interpret;
use crate::prompt::build_prompt;
use std::sync::Arc;
use stockchat_core::error::Error;
use stockchat_core::item::InventoryStore;
use stockchat_core::provider::{Provider, ProviderRequest};
use stockchat_core::schema::ContextRetriever;
use tracing::{debug, info, warn};

/// Drives one request/response cycle against the collaborators.
pub struct ChatTurn {
    provider: Arc<dyn Provider>,
    retriever: Arc<dyn ContextRetriever>,
    dispatcher: Dispatcher,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    top_k: usize,
}

impl ChatTurn {
    pub fn new(
        provider: Arc<dyn Provider>,
        retriever: Arc<dyn ContextRetriever>,
        store: Arc<dyn InventoryStore>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            retriever,
            dispatcher: Dispatcher::new(store),
            model: model.into(),
            temperature: 0.2,
            max_tokens: None,
            top_k: 2,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set how many schema documents are retrieved per turn.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Run one turn: user text in, display text out.
    ///
    /// `Err` means a collaborator failed (model unreachable, store down);
    /// misformatted model output is handled inside and never errors.
    pub async fn run(&self, user_text: &str) -> std::result::Result<String, Error> {
        let context = self.retrieve_context(user_text).await;
        let prompt = build_prompt(&context, user_text);

        debug!(prompt_len = prompt.len(), model = %self.model, "invoking model");

        let response = self
            .provider
            .complete(ProviderRequest {
                model: self.model.clone(),
                prompt,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stop: vec![],
            })
            .await?;

        let intent = interpret(&response.text);
        info!(?intent, "turn interpreted");

        self.dispatcher.dispatch(intent).await
    }

    /// Retrieve schema context, failing open to an empty context — a turn
    /// with no schema hints is degraded, not dead.
    async fn retrieve_context(&self, query: &str) -> String {
        match self.retriever.retrieve(query, self.top_k).await {
            Ok(docs) => {
                debug!(count = docs.len(), "schema context retrieved");
                docs.iter()
                    .map(|d| d.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Err(e) => {
                warn!("schema retrieval failed: {e}");
                String::new()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{NullRetriever, ScriptedProvider};
    use stockchat_store::in_memory::InMemoryStore;

    fn turn(raw_response: &str, store: Arc<InMemoryStore>) -> ChatTurn {
        ChatTurn::new(
            Arc::new(ScriptedProvider::single(raw_response)),
            Arc::new(NullRetriever),
            store,
            "mock-model",
        )
    }

    #[tokio::test]
    async fn action_turn_mutates_store_once() {
        let store = Arc::new(InMemoryStore::new());
        let t = turn(
            r#"ACTION: add_item {"name": "laptop", "quantity": 1}"#,
            store.clone(),
        );

        let reply = t.run("add a laptop").await.unwrap();
        assert_eq!(reply, "Added item: laptop");

        let items = store.list_items(None).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
    }

    #[tokio::test]
    async fn answer_turn_touches_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let t = turn("ANSWER: There are 4 items.", store.clone());

        let reply = t.run("how many items?").await.unwrap();
        assert_eq!(reply, "There are 4 items.");
        assert!(store.list_items(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chatty_model_output_fails_open() {
        let store = Arc::new(InMemoryStore::new());
        let t = turn("The weather is nice today", store);

        let reply = t.run("what's the weather?").await.unwrap();
        assert_eq!(reply, "The weather is nice today");
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let store = Arc::new(InMemoryStore::new());
        let t = ChatTurn::new(
            Arc::new(ScriptedProvider::failing()),
            Arc::new(NullRetriever),
            store,
            "mock-model",
        );

        assert!(matches!(
            t.run("anything").await,
            Err(Error::Provider(_))
        ));
    }

    #[tokio::test]
    async fn retrieval_failure_degrades_rather_than_fails() {
        let store = Arc::new(InMemoryStore::new());
        let t = ChatTurn::new(
            Arc::new(ScriptedProvider::single("ANSWER: still works")),
            Arc::new(crate::test_helpers::FailingRetriever),
            store,
            "mock-model",
        );

        let reply = t.run("anything").await.unwrap();
        assert_eq!(reply, "still works");
    }

    #[tokio::test]
    async fn prompt_carries_retrieved_context() {
        let store = Arc::new(InMemoryStore::new());
        let provider = Arc::new(ScriptedProvider::single("ANSWER: ok"));
        let t = ChatTurn::new(
            provider.clone(),
            Arc::new(crate::test_helpers::StaticRetriever::with_content(
                "Table: items has columns id, name",
            )),
            store,
            "mock-model",
        );

        t.run("what columns exist?").await.unwrap();
        let prompt = provider.last_prompt().expect("provider was called");
        assert!(prompt.contains("Table: items has columns id, name"));
        assert!(prompt.contains("what columns exist?"));
    }
}
