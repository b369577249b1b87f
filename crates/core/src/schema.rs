//! Schema-context documents and the retrieval trait.
//!
//! Schema documents describe the inventory database (tables, available
//! actions) and are ranked against the user's query to supply the model
//! with just the relevant slice of schema per turn.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One retrievable schema-context snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDoc {
    /// Stable identifier (e.g. "table:items", "actions").
    pub id: String,

    /// The snippet text injected into the prompt.
    pub content: String,

    /// Document kind ("table", "actions").
    pub kind: String,

    /// Embedding vector, when an embedder has been run over the index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Relevance score assigned during retrieval; 0.0 at rest.
    #[serde(default)]
    pub score: f32,
}

impl SchemaDoc {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            kind: kind.into(),
            embedding: None,
            score: 0.0,
        }
    }
}

/// The retrieval trait — query string in, ranked context snippets out.
///
/// Implemented by the schema index; mocked in tests.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Return up to `top_k` documents ranked by relevance to `query`.
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<SchemaDoc>, RetrievalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_starts_unscored() {
        let doc = SchemaDoc::new("table:items", "table", "Table: items ...");
        assert_eq!(doc.score, 0.0);
        assert!(doc.embedding.is_none());
    }
}
