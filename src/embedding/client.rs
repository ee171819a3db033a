//! HTTP client for the external embedding provider.
//!
//! Wire contract:
//! - `POST {base}/embed {"text"}` -> `{"embedding": [f32], "dimensions": n}`
//! - `POST {base}/embed/batch {"texts"}` -> `{"embeddings", "count", "dimensions"}`
//! - `GET {base}/health` -> 200 when healthy
//!
//! Transport errors and timeouts map to `EmbeddingUnavailable`; non-2xx
//! responses to `EmbeddingInvalid`. No retries here — retry policy, if any,
//! belongs to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::{Result, SearchError};

/// Pluggable embedding backend. Injected everywhere a vector is needed so
/// the unavailable case is testable with a stub.
pub trait EmbeddingProvider: Send + Sync {
    /// Convert text to a fixed-length vector. Rejects empty text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Convert several texts in one round trip. Rejects an empty slice.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Liveness probe. Logged at startup; never blocks serving.
    fn is_healthy(&self) -> bool;

    /// Vector dimension this provider produces.
    fn dims(&self) -> usize;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
    dimensions: usize,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<Vec<f32>>,
    #[allow(dead_code)]
    count: usize,
    dimensions: usize,
}

/// Blocking HTTP client for the embedding service.
pub struct HttpEmbeddingClient {
    base_url: String,
    dims: usize,
    client: reqwest::blocking::Client,
}

impl HttpEmbeddingClient {
    /// Build a client from config. The timeout bounds every request; a slow
    /// provider slows each caller individually but never hangs it.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| SearchError::Config(format!("build http client: {err}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dims: config.dims as usize,
            client,
        })
    }

    fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<reqwest::blocking::Response> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|err| SearchError::EmbeddingUnavailable(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(SearchError::EmbeddingInvalid(format!(
                "HTTP {status}: {body}"
            )));
        }
        Ok(response)
    }

    fn check_dims(&self, got: usize) -> Result<()> {
        if got != self.dims {
            return Err(SearchError::EmbeddingInvalid(format!(
                "dimension mismatch: expected {}, got {got}",
                self.dims
            )));
        }
        Ok(())
    }
}

impl EmbeddingProvider for HttpEmbeddingClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidInput("text cannot be empty".into()));
        }

        let response = self.post_json("/embed", &EmbedRequest { text })?;
        let parsed: EmbedResponse = response
            .json()
            .map_err(|err| SearchError::EmbeddingInvalid(format!("decode response: {err}")))?;

        self.check_dims(parsed.dimensions)?;
        debug!(dims = parsed.dimensions, "embedded text");
        Ok(parsed.embedding)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(SearchError::InvalidInput("texts cannot be empty".into()));
        }

        let response = self.post_json("/embed/batch", &BatchEmbedRequest { texts })?;
        let parsed: BatchEmbedResponse = response
            .json()
            .map_err(|err| SearchError::EmbeddingInvalid(format!("decode response: {err}")))?;

        self.check_dims(parsed.dimensions)?;
        Ok(parsed.embeddings)
    }

    fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send() {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpEmbeddingClient {
        let config = EmbeddingConfig {
            base_url: server.base_url(),
            timeout_secs: 2,
            dims: 4,
        };
        HttpEmbeddingClient::new(&config).unwrap()
    }

    #[test]
    fn test_embed_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/embed")
                .json_body(json!({"text": "software engineer"}));
            then.status(200)
                .json_body(json!({"embedding": [0.1, 0.2, 0.3, 0.4], "dimensions": 4}));
        });

        let client = client_for(&server);
        let vector = client.embed("software engineer").unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3, 0.4]);
        mock.assert();
    }

    #[test]
    fn test_embed_rejects_empty_text() {
        let server = MockServer::start();
        let client = client_for(&server);
        assert!(matches!(
            client.embed("   "),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_embed_maps_500_to_invalid() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embed");
            then.status(500).body("model exploded");
        });

        let client = client_for(&server);
        let err = client.embed("anything").unwrap_err();
        assert!(matches!(err, SearchError::EmbeddingInvalid(_)));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_embed_maps_transport_error_to_unavailable() {
        // Port nobody listens on
        let config = EmbeddingConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 1,
            dims: 4,
        };
        let client = HttpEmbeddingClient::new(&config).unwrap();
        assert!(matches!(
            client.embed("anything"),
            Err(SearchError::EmbeddingUnavailable(_))
        ));
    }

    #[test]
    fn test_embed_rejects_dimension_mismatch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embed");
            then.status(200)
                .json_body(json!({"embedding": [0.1, 0.2], "dimensions": 2}));
        });

        let client = client_for(&server);
        assert!(matches!(
            client.embed("anything"),
            Err(SearchError::EmbeddingInvalid(_))
        ));
    }

    #[test]
    fn test_embed_batch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/embed/batch")
                .json_body(json!({"texts": ["a", "b"]}));
            then.status(200).json_body(json!({
                "embeddings": [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]],
                "count": 2,
                "dimensions": 4
            }));
        });

        let client = client_for(&server);
        let vectors = client
            .embed_batch(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0][0], 1.0);
    }

    #[test]
    fn test_embed_batch_rejects_empty() {
        let server = MockServer::start();
        let client = client_for(&server);
        assert!(matches!(
            client.embed_batch(&[]),
            Err(SearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_health_check() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        });
        assert!(client_for(&server).is_healthy());
    }

    #[test]
    fn test_health_check_unhealthy_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(503);
        });
        assert!(!client_for(&server).is_healthy());
    }

    #[test]
    fn test_health_check_unreachable() {
        let config = EmbeddingConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 1,
            dims: 4,
        };
        let client = HttpEmbeddingClient::new(&config).unwrap();
        assert!(!client.is_healthy());
    }
}
