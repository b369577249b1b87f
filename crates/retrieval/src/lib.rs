//! Schema context retrieval.
//!
//! Holds a small corpus of schema documents describing the inventory
//! database and the available actions. Given a user query, returns the
//! most relevant documents: by embedding cosine similarity when an
//! embedding model is wired in, by keyword overlap otherwise.

pub mod vector;

use async_trait::async_trait;
use std::sync::Arc;
use stockchat_core::error::RetrievalError;
use stockchat_core::provider::{EmbeddingRequest, Provider};
use stockchat_core::schema::{ContextRetriever, SchemaDoc};
use tracing::{debug, info, warn};

/// The built-in schema corpus for the inventory database.
pub fn default_schema_docs() -> Vec<SchemaDoc> {
    vec![
        SchemaDoc::new(
            "items_table",
            "table",
            "Table: items\n\
             Columns: id (integer, primary key), name (string), description (text), \
             quantity (integer), category (string)\n\
             Description: Stores inventory items with their details.",
        ),
        SchemaDoc::new(
            "actions",
            "actions",
            "Available actions:\n\
             - add_item: Add a new item to the inventory. Parameters: name (required), \
             description, quantity, category.\n\
             - list_items: List inventory items, optionally filtered by category. \
             Parameters: category.\n\
             - update_quantity: Change an item's stock level. Parameters: item_id \
             (required), new_quantity (required).",
        ),
    ]
}

struct Embedder {
    provider: Arc<dyn Provider>,
    model: String,
}

/// An in-process retrieval index over schema documents.
///
/// Without an embedder the index ranks by keyword overlap. With one, call
/// [`SchemaIndex::build_embeddings`] once at startup; retrieval then embeds
/// each query and ranks by cosine similarity, falling back to keywords if
/// the documents were never embedded.
pub struct SchemaIndex {
    docs: Vec<SchemaDoc>,
    embedder: Option<Embedder>,
}

impl SchemaIndex {
    /// Create an index in keyword mode.
    pub fn new(docs: Vec<SchemaDoc>) -> Self {
        Self {
            docs,
            embedder: None,
        }
    }

    /// Attach an embedding provider and model.
    pub fn with_embedder(mut self, provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        self.embedder = Some(Embedder {
            provider,
            model: model.into(),
        });
        self
    }

    /// Embed every document in the index. Returns the number embedded.
    ///
    /// No-op in keyword mode.
    pub async fn build_embeddings(&mut self) -> Result<usize, RetrievalError> {
        let Some(embedder) = &self.embedder else {
            return Ok(0);
        };

        let inputs: Vec<String> = self.docs.iter().map(|d| d.content.clone()).collect();
        let response = embedder
            .provider
            .embed(EmbeddingRequest {
                model: embedder.model.clone(),
                inputs,
            })
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

        if response.embeddings.len() != self.docs.len() {
            return Err(RetrievalError::EmbeddingFailed(format!(
                "expected {} embeddings, got {}",
                self.docs.len(),
                response.embeddings.len()
            )));
        }

        for (doc, emb) in self.docs.iter_mut().zip(response.embeddings) {
            doc.embedding = Some(emb);
        }

        info!("Embedded {} schema documents", self.docs.len());
        Ok(self.docs.len())
    }

    fn has_embeddings(&self) -> bool {
        self.docs.iter().any(|d| d.embedding.is_some())
    }
}

#[async_trait]
impl ContextRetriever for SchemaIndex {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SchemaDoc>, RetrievalError> {
        if self.docs.is_empty() || top_k == 0 {
            return Ok(vec![]);
        }

        if let Some(embedder) = &self.embedder {
            if self.has_embeddings() {
                let response = embedder
                    .provider
                    .embed(EmbeddingRequest {
                        model: embedder.model.clone(),
                        inputs: vec![query.to_string()],
                    })
                    .await
                    .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

                let query_emb = response.embeddings.into_iter().next().ok_or_else(|| {
                    RetrievalError::EmbeddingFailed("empty embedding response".into())
                })?;

                let ranked = vector::vector_rank(&self.docs, &query_emb, top_k);
                debug!("Vector retrieval returned {} documents", ranked.len());
                return Ok(ranked);
            }
            warn!("Index has an embedder but no document embeddings; using keyword ranking");
        }

        let ranked = vector::keyword_rank(&self.docs, query, top_k);
        debug!("Keyword retrieval returned {} documents", ranked.len());
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockchat_core::error::ProviderError;
    use stockchat_core::provider::{EmbeddingResponse, ProviderRequest, ProviderResponse};

    struct FixedEmbedder {
        vectors: Vec<Vec<f32>>,
    }

    #[async_trait]
    impl Provider for FixedEmbedder {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("completion".into()))
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> Result<EmbeddingResponse, ProviderError> {
            // One fixed vector per input, cycling through the configured set.
            let embeddings = request
                .inputs
                .iter()
                .enumerate()
                .map(|(i, _)| self.vectors[i % self.vectors.len()].clone())
                .collect();
            Ok(EmbeddingResponse {
                embeddings,
                model: request.model,
            })
        }
    }

    #[tokio::test]
    async fn keyword_mode_ranks_schema_doc_first() {
        let index = SchemaIndex::new(default_schema_docs());
        let docs = index
            .retrieve("what columns does the items table have", 1)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "items_table");
    }

    #[tokio::test]
    async fn retrieve_respects_top_k() {
        let index = SchemaIndex::new(default_schema_docs());
        let docs = index.retrieve("items", 2).await.unwrap();
        assert_eq!(docs.len(), 2);

        let none = index.retrieve("items", 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn empty_index_returns_nothing() {
        let index = SchemaIndex::new(vec![]);
        assert!(index.retrieve("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_mode_ranks_by_cosine() {
        let provider = Arc::new(FixedEmbedder {
            // Doc 0 gets [1,0], doc 1 gets [0,1]; a single-input (query)
            // request gets [1,0], so doc 0 should rank first.
            vectors: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        });

        let mut index = SchemaIndex::new(default_schema_docs())
            .with_embedder(provider, "test-embed");
        let embedded = index.build_embeddings().await.unwrap();
        assert_eq!(embedded, 2);

        let docs = index.retrieve("anything at all", 1).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "items_table");
        assert!(docs[0].score > 0.9);
    }

    #[tokio::test]
    async fn embedder_without_built_index_falls_back_to_keywords() {
        let provider = Arc::new(FixedEmbedder {
            vectors: vec![vec![1.0, 0.0]],
        });
        let index = SchemaIndex::new(default_schema_docs())
            .with_embedder(provider, "test-embed");

        // build_embeddings was never called
        let docs = index.retrieve("add_item action parameters", 1).await.unwrap();
        assert_eq!(docs[0].id, "actions");
    }

    #[tokio::test]
    async fn build_embeddings_is_noop_without_embedder() {
        let mut index = SchemaIndex::new(default_schema_docs());
        assert_eq!(index.build_embeddings().await.unwrap(), 0);
    }
}
