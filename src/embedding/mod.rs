//! Embedding provider interface and HTTP client.

pub mod client;

pub use client::{EmbeddingProvider, HttpEmbeddingClient};

/// Cosine similarity between two vectors, 0.0 when either norm is zero or
/// lengths differ. Equals `1 - cosine_distance`.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
