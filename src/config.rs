use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

impl Config {
    /// Load configuration, lowest priority first: defaults, the global
    /// config file, an explicit `--config`/`JSEARCH_CONFIG` file, then
    /// environment variable overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("JSEARCH_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("jsearch/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SearchError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SearchError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.store {
            self.store.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.enrich {
            self.enrich.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("JSEARCH_DB_PATH") {
            self.store.path = PathBuf::from(value);
        }
        if let Some(value) = env_string("JSEARCH_EMBEDDING_URL") {
            self.embedding.base_url = value;
        }
        if let Some(value) = env_u64("JSEARCH_EMBEDDING_TIMEOUT_SECS")? {
            self.embedding.timeout_secs = value;
        }
        if let Some(value) = env_u32("JSEARCH_EMBEDDING_DIMS")? {
            self.embedding.dims = value;
        }
        if let Some(value) = env_f32("JSEARCH_SIMILARITY_THRESHOLD")? {
            self.search.similarity_threshold = value;
        }
        if let Some(value) = env_u32("JSEARCH_ENRICH_WORKERS")? {
            self.enrich.workers = value;
        }
        if let Some(value) = env_u32("JSEARCH_ENRICH_QUEUE_CAPACITY")? {
            self.enrich.queue_capacity = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.embedding.base_url.trim().is_empty() {
            return Err(SearchError::MissingConfig("embedding.base_url".into()));
        }
        if self.embedding.dims == 0 {
            return Err(SearchError::Config(
                "embedding.dims must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.search.similarity_threshold) {
            return Err(SearchError::Config(format!(
                "search.similarity_threshold must be in [0, 1], got {}",
                self.search.similarity_threshold
            )));
        }
        if self.enrich.workers == 0 {
            return Err(SearchError::Config(
                "enrich.workers must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// SQLite store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("jsearch/jobs.db"),
        }
    }
}

impl StoreConfig {
    fn merge(&mut self, patch: StorePatch) {
        if let Some(path) = patch.path {
            self.path = path;
        }
    }
}

/// Embedding provider endpoint and client behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding HTTP service.
    pub base_url: String,
    /// Per-request timeout. No retries at the client layer.
    pub timeout_secs: u64,
    /// Expected vector dimension; mismatched responses are rejected.
    pub dims: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8006".to_string(),
            timeout_secs: 10,
            dims: 384,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(base_url) = patch.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_secs) = patch.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(dims) = patch.dims {
            self.dims = dims;
        }
    }
}

/// Thresholds and caps for the query paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum cosine similarity for a semantic match. Low on purpose so
    /// broad semantic matches still surface.
    pub similarity_threshold: f32,
    /// Hard cap on semantic and skill result counts.
    pub result_cap: u32,
    /// Default page size for filter search.
    pub default_page_size: u32,
    /// Upper bound on page size; out-of-range requests fall back to the
    /// default page size.
    pub max_page_size: u32,
    /// Minimum trigram similarity for a fuzzy skill match.
    pub fuzzy_floor: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.35,
            result_cap: 20,
            default_page_size: 20,
            max_page_size: 100,
            fuzzy_floor: 0.3,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.similarity_threshold {
            self.similarity_threshold = value;
        }
        if let Some(value) = patch.result_cap {
            self.result_cap = value;
        }
        if let Some(value) = patch.default_page_size {
            self.default_page_size = value;
        }
        if let Some(value) = patch.max_page_size {
            self.max_page_size = value;
        }
        if let Some(value) = patch.fuzzy_floor {
            self.fuzzy_floor = value;
        }
    }
}

/// Enrichment queue sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Worker threads draining the queue. Each owns its own DB connection.
    pub workers: u32,
    /// Bounded queue capacity; a full queue drops tasks with a warning.
    pub queue_capacity: u32,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: 64,
        }
    }
}

impl EnrichConfig {
    fn merge(&mut self, patch: EnrichPatch) {
        if let Some(value) = patch.workers {
            self.workers = value;
        }
        if let Some(value) = patch.queue_capacity {
            self.queue_capacity = value;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    embedding: Option<EmbeddingPatch>,
    search: Option<SearchPatch>,
    enrich: Option<EnrichPatch>,
}

#[derive(Debug, Deserialize)]
struct StorePatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    dims: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchPatch {
    similarity_threshold: Option<f32>,
    result_cap: Option<u32>,
    default_page_size: Option<u32>,
    max_page_size: Option<u32>,
    fuzzy_floor: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct EnrichPatch {
    workers: Option<u32>,
    queue_capacity: Option<u32>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match env_string(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SearchError::Config(format!("{key} must be an integer, got {raw:?}"))),
        None => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match env_string(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SearchError::Config(format!("{key} must be an integer, got {raw:?}"))),
        None => Ok(None),
    }
}

fn env_f32(key: &str) -> Result<Option<f32>> {
    match env_string(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SearchError::Config(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.similarity_threshold, 0.35);
        assert_eq!(config.search.result_cap, 20);
        assert_eq!(config.search.default_page_size, 20);
        assert_eq!(config.search.max_page_size, 100);
        assert_eq!(config.search.fuzzy_floor, 0.3);
        assert_eq!(config.embedding.timeout_secs, 10);
        assert_eq!(config.embedding.dims, 384);
        assert_eq!(config.enrich.workers, 1);
    }

    #[test]
    fn test_merge_patch_partial() {
        let mut config = Config::default();
        let patch: ConfigPatch = toml::from_str(
            r#"
            [embedding]
            base_url = "http://embeddings.internal:9000"

            [search]
            similarity_threshold = 0.5
            "#,
        )
        .unwrap();
        config.merge_patch(patch);

        assert_eq!(config.embedding.base_url, "http://embeddings.internal:9000");
        assert_eq!(config.search.similarity_threshold, 0.5);
        // Untouched fields keep defaults
        assert_eq!(config.search.result_cap, 20);
        assert_eq!(config.embedding.timeout_secs, 10);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = Config::default();
        config.search.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_dims() {
        let mut config = Config::default();
        config.embedding.dims = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = Config::default();
        config.embedding.base_url = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(SearchError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [store]
            path = "/tmp/jsearch-test.db"

            [enrich]
            workers = 4
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/jsearch-test.db"));
        assert_eq!(config.enrich.workers, 4);
    }
}
