//! Semantic search over job titles.
//!
//! The query text is vectorized through the injected provider, then scored
//! against every active job that has an embedding. A provider failure fails
//! the whole search — there is deliberately no keyword fallback, so callers
//! see a clear "semantic search is down" instead of silently different
//! results.

use std::cmp::Ordering;

use tracing::debug;

use crate::embedding::{EmbeddingProvider, cosine_similarity};
use crate::error::{Result, SearchError};
use crate::model::RankedJob;
use crate::store::Database;

/// Run a semantic search. Results carry `similarity` strictly above
/// `threshold`, ordered by similarity descending with creation time
/// descending as the deterministic tie-break, capped at `cap`.
pub fn semantic_search(
    db: &Database,
    provider: &dyn EmbeddingProvider,
    query: &str,
    threshold: f32,
    cap: usize,
) -> Result<Vec<RankedJob>> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidInput(
            "query text cannot be empty".into(),
        ));
    }

    let query_vector = provider.embed(query)?;

    let candidates = db.semantic_candidates()?;
    debug!(candidates = candidates.len(), "scoring semantic candidates");

    let mut results: Vec<RankedJob> = candidates
        .into_iter()
        .filter_map(|job| {
            let embedding = job.title_embedding.as_deref()?;
            let similarity = cosine_similarity(&query_vector, embedding);
            (similarity > threshold).then(|| RankedJob {
                similarity: Some(similarity),
                job,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        match b
            .similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => b.job.created_at.cmp(&a.job.created_at),
            other => other,
        }
    });
    results.truncate(cap);

    Ok(results)
}
