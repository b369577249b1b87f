//! Similarity scoring for schema documents.
//!
//! Pure-Rust implementations of cosine similarity and a keyword-overlap
//! fallback used when no embedding model is available.

use stockchat_core::schema::SchemaDoc;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank documents by cosine similarity to a query embedding.
///
/// Returns documents sorted by descending similarity, with `score` set to
/// the cosine similarity value. Documents without embeddings are skipped.
pub fn vector_rank(docs: &[SchemaDoc], query_embedding: &[f32], limit: usize) -> Vec<SchemaDoc> {
    let mut scored: Vec<(f32, SchemaDoc)> = docs
        .iter()
        .filter_map(|doc| {
            let emb = doc.embedding.as_ref()?;
            let sim = cosine_similarity(emb, query_embedding);
            let mut d = doc.clone();
            d.score = sim;
            Some((sim, d))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, d)| d).collect()
}

/// Score a document by keyword overlap with the query.
///
/// Counts distinct query words that appear in the document content
/// (case-insensitive), normalized by the number of query words.
pub fn keyword_score(content: &str, query: &str) -> f32 {
    let content_lower = content.to_lowercase();
    let words: Vec<&str> = query
        .split_whitespace()
        .filter(|w| w.len() > 1)
        .collect();
    if words.is_empty() {
        return 0.0;
    }

    let matches = words
        .iter()
        .filter(|w| content_lower.contains(&w.to_lowercase()))
        .count();

    matches as f32 / words.len() as f32
}

/// Rank documents by keyword overlap with the query.
pub fn keyword_rank(docs: &[SchemaDoc], query: &str, limit: usize) -> Vec<SchemaDoc> {
    let mut scored: Vec<SchemaDoc> = docs
        .iter()
        .cloned()
        .map(|mut d| {
            d.score = keyword_score(&d.content, query);
            d
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}
