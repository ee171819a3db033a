//! Service facade wiring the store, the embedding provider and the
//! enrichment queue behind the three public query operations.
//!
//! `create_job` and `update_job` exist as enrichment trigger points; full
//! CRUD, auth and the rest of the job board live outside this crate.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::embedding::{EmbeddingProvider, HttpEmbeddingClient};
use crate::enrich::{BackfillReport, EnrichmentQueue, backfill};
use crate::error::Result;
use crate::model::{Job, JobPage, NewJob, RankedJob, Skill};
use crate::search::{self, JobFilters, Page};
use crate::store::Database;

pub struct SearchService {
    config: Config,
    db: Database,
    provider: Arc<dyn EmbeddingProvider>,
    enrichment: Option<EnrichmentQueue>,
}

impl SearchService {
    /// Wire up the default production stack: SQLite store, HTTP embedding
    /// client, enrichment worker pool. The provider health probe is logged
    /// only; an unhealthy provider degrades semantic search, nothing else.
    pub fn open(config: Config) -> Result<Self> {
        let provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingClient::new(&config.embedding)?);
        Self::with_provider(config, provider)
    }

    /// Wire up with an injected provider. Tests use this with stubs.
    pub fn with_provider(config: Config, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        if provider.is_healthy() {
            info!("embedding provider connected");
        } else {
            warn!("embedding provider not available, semantic search degraded");
        }

        let db = Database::open(&config.store.path)?;
        let enrichment = Some(EnrichmentQueue::new(
            config.store.path.clone(),
            Arc::clone(&provider),
            &config.enrich,
        )?);

        Ok(Self {
            config,
            db,
            provider,
            enrichment,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Whether the embedding provider currently answers its health probe.
    pub fn provider_healthy(&self) -> bool {
        self.provider.is_healthy()
    }

    /// Vector dimension the provider produces.
    pub fn provider_dims(&self) -> usize {
        self.provider.dims()
    }

    // --- query surface ---

    /// Keyword/filter search: conjunctive predicates, paginated, no score.
    pub fn search(&self, filters: &JobFilters, page: u32, limit: u32) -> Result<JobPage> {
        let page = Page::clamped(
            page,
            limit,
            self.config.search.default_page_size,
            self.config.search.max_page_size,
        );
        search::search_jobs(&self.db, filters, page)
    }

    /// Semantic search over titles. Fails outright when the provider is
    /// down; there is no keyword fallback.
    pub fn semantic_search(&self, query: &str) -> Result<Vec<RankedJob>> {
        search::semantic_search(
            &self.db,
            self.provider.as_ref(),
            query,
            self.config.search.similarity_threshold,
            self.config.search.result_cap as usize,
        )
    }

    /// Skill-name lookup with the layered rank-then-score ordering.
    pub fn search_skills(&self, term: &str) -> Result<Vec<Skill>> {
        search::search_skills(
            &self.db,
            term,
            self.config.search.fuzzy_floor,
            self.config.search.result_cap as usize,
        )
    }

    // --- enrichment triggers ---

    /// Persist a new posting and queue its title for enrichment. The job is
    /// immediately keyword-searchable; it becomes semantically searchable
    /// after the enrichment task lands.
    pub fn create_job(&self, new_job: NewJob) -> Result<Job> {
        let job = new_job.into_job();
        self.db.insert_job(&job)?;
        if let Some(queue) = &self.enrichment {
            queue.enqueue(&job.id, &job.title);
        }
        Ok(job)
    }

    /// Persist posting changes and re-queue enrichment only when the title
    /// changed — the embedding tracks the title and nothing else.
    pub fn update_job(&self, job: &Job) -> Result<()> {
        let previous = self
            .db
            .get_job(&job.id)?
            .ok_or_else(|| crate::error::SearchError::NotFound(format!("job {}", job.id)))?;

        self.db.update_job(job)?;

        if previous.title != job.title {
            if let Some(queue) = &self.enrichment {
                queue.enqueue(&job.id, &job.title);
            }
        }
        Ok(())
    }

    /// Sweep jobs with no embedding, outside the request path.
    pub fn backfill(&self) -> Result<BackfillReport> {
        backfill(&self.db, self.provider.as_ref())
    }

    /// Seed a skill into the vocabulary.
    pub fn add_skill(&self, name: &str, color: Option<String>) -> Result<Skill> {
        let skill = Skill::new(name, color);
        self.db.insert_skill(&skill)?;
        Ok(skill)
    }

    /// Join the enrichment workers after draining the queue. Called on
    /// shutdown so in-flight embeds land before the process exits.
    pub fn close(mut self) {
        if let Some(queue) = self.enrichment.take() {
            queue.close();
        }
    }
}
