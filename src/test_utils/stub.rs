//! Deterministic embedding stubs.
//!
//! [`StubEmbedder`] is an FNV-1a hash embedder: no model, no network, fully
//! deterministic, yet related texts land closer together than unrelated
//! ones — enough signal for ranking tests. [`FailingEmbedder`] simulates a
//! provider outage.

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SearchError};

/// Hash embedder used as an in-process stand-in for the HTTP provider.
pub struct StubEmbedder {
    dim: usize,
}

impl StubEmbedder {
    /// Create embedder with the given dimension.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut embedding = vec![0.0; self.dim];

        if tokens.is_empty() {
            return embedding;
        }

        for token in &tokens {
            accumulate(&mut embedding, token, 1.0);
        }
        for window in tokens.windows(2) {
            let bigram = format!("{} {}", window[0], window[1]);
            accumulate(&mut embedding, &bigram, 0.5);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl EmbeddingProvider for StubEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidInput("text cannot be empty".into()));
        }
        Ok(self.embed_text(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(SearchError::InvalidInput("texts cannot be empty".into()));
        }
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn dims(&self) -> usize {
        self.dim
    }
}

/// Provider that is always down.
pub struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(SearchError::EmbeddingUnavailable(
            "stub provider is down".into(),
        ))
    }

    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(SearchError::EmbeddingUnavailable(
            "stub provider is down".into(),
        ))
    }

    fn is_healthy(&self) -> bool {
        false
    }

    fn dims(&self) -> usize {
        0
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

fn accumulate(embedding: &mut [f32], token: &str, weight: f32) {
    let token_hash = fnv1a_hash(token.as_bytes());

    for i in 0..embedding.len() {
        let dim_hash = fnv1a_hash_with_salt(token_hash, i as u64);
        let sign = if dim_hash & 1 == 0 { weight } else { -weight };
        let dim = ((dim_hash >> 1) as usize) % embedding.len();
        embedding[dim] += sign;
    }
}

fn fnv1a_hash_with_salt(seed: u64, salt: u64) -> u64 {
    // Salt first. Small salts are mostly zero bytes, and FNV-1a barely
    // mixes trailing zeros; the seed has to be the tail of the stream.
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&salt.to_le_bytes());
    bytes[8..].copy_from_slice(&seed.to_le_bytes());
    fnv1a_hash(&bytes)
}

fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}
