//! Asynchronous embedding enrichment.
//!
//! Job creation and title changes hand a task to a bounded queue; worker
//! threads vectorize the title and persist it. The triggering request has
//! already completed by then, so failures here are logged and counted,
//! never propagated. A full queue drops the task — the backfill sweep picks
//! up anything that slipped through.
//!
//! Each task carries the title it was computed from, and the store write is
//! conditional on the job still holding that title. Two racing enrichments
//! for the same job therefore cannot leave a vector that matches no title
//! the job ever had; a write for a superseded title simply misses.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::EnrichConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::store::Database;

/// One unit of enrichment work.
#[derive(Debug, Clone)]
struct EnrichTask {
    job_id: String,
    title: String,
}

/// Counters observed by tests and the health command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichStats {
    pub enqueued: u64,
    pub dropped: u64,
    pub completed: u64,
    pub stale: u64,
    pub failed: u64,
}

/// Bounded work queue with a fixed worker pool. Workers each own a database
/// connection; the queue owns nothing of the caller's request path.
pub struct EnrichmentQueue {
    tx: Option<Sender<EnrichTask>>,
    handles: Vec<JoinHandle<()>>,
    stats: Arc<Mutex<EnrichStats>>,
}

impl EnrichmentQueue {
    /// Spawn the worker pool. `db_path` is opened once per worker.
    pub fn new(
        db_path: PathBuf,
        provider: Arc<dyn EmbeddingProvider>,
        config: &EnrichConfig,
    ) -> Result<Self> {
        let (tx, rx) = bounded(config.queue_capacity.max(1) as usize);
        let stats = Arc::new(Mutex::new(EnrichStats::default()));

        let mut handles = Vec::new();
        for worker_id in 0..config.workers.max(1) {
            let rx: Receiver<EnrichTask> = rx.clone();
            let provider = Arc::clone(&provider);
            let stats = Arc::clone(&stats);
            let db = Database::open(&db_path)?;

            handles.push(std::thread::spawn(move || {
                debug!(worker_id, "enrichment worker started");
                for task in rx.iter() {
                    run_task(&db, provider.as_ref(), &task, &stats);
                }
                debug!(worker_id, "enrichment worker stopped");
            }));
        }

        Ok(Self {
            tx: Some(tx),
            handles,
            stats,
        })
    }

    /// Hand a task to the queue without blocking. A full queue drops the
    /// task with a warning; the job stays keyword-searchable and the next
    /// backfill sweep will enrich it.
    pub fn enqueue(&self, job_id: impl Into<String>, title: impl Into<String>) {
        let task = EnrichTask {
            job_id: job_id.into(),
            title: title.into(),
        };

        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(task) {
            Ok(()) => self.stats.lock().enqueued += 1,
            Err(TrySendError::Full(task)) => {
                warn!(job_id = %task.job_id, "enrichment queue full, dropping task");
                self.stats.lock().dropped += 1;
            }
            Err(TrySendError::Disconnected(task)) => {
                warn!(job_id = %task.job_id, "enrichment queue closed, dropping task");
                self.stats.lock().dropped += 1;
            }
        }
    }

    /// Snapshot of the queue counters.
    #[must_use]
    pub fn stats(&self) -> EnrichStats {
        self.stats.lock().clone()
    }

    /// Drain remaining tasks and join the workers.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.tx.take();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("enrichment worker panicked");
            }
        }
    }
}

impl Drop for EnrichmentQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_task(
    db: &Database,
    provider: &dyn EmbeddingProvider,
    task: &EnrichTask,
    stats: &Mutex<EnrichStats>,
) {
    let vector = match provider.embed(&task.title) {
        Ok(vector) => vector,
        Err(err) => {
            warn!(job_id = %task.job_id, error = %err, "enrichment embed failed");
            stats.lock().failed += 1;
            return;
        }
    };

    match db.set_embedding_if_title(&task.job_id, &task.title, &vector) {
        Ok(true) => {
            debug!(job_id = %task.job_id, "title embedding persisted");
            stats.lock().completed += 1;
        }
        Ok(false) => {
            // Title changed under us; a newer task owns the fresh title
            debug!(job_id = %task.job_id, "discarding stale enrichment write");
            stats.lock().stale += 1;
        }
        Err(err) => {
            warn!(job_id = %task.job_id, error = %err, "enrichment write failed");
            stats.lock().failed += 1;
        }
    }
}

/// Outcome of a backfill sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BackfillReport {
    pub scanned: u64,
    pub enriched: u64,
    pub failed: u64,
}

/// Sequentially enrich every job that has no embedding yet. Per-job
/// failures are logged and counted; the sweep always runs to the end.
pub fn backfill(db: &Database, provider: &dyn EmbeddingProvider) -> Result<BackfillReport> {
    let pending = db.jobs_missing_embedding()?;
    let mut report = BackfillReport {
        scanned: pending.len() as u64,
        ..BackfillReport::default()
    };

    for (job_id, title) in pending {
        match provider
            .embed(&title)
            .and_then(|vector| db.set_embedding_if_title(&job_id, &title, &vector))
        {
            Ok(true) => report.enriched += 1,
            Ok(false) => {
                debug!(job_id = %job_id, "job title changed during backfill, skipping");
            }
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "backfill enrichment failed");
                report.failed += 1;
            }
        }
    }

    info!(
        scanned = report.scanned,
        enriched = report.enriched,
        failed = report.failed,
        "backfill sweep finished"
    );
    Ok(report)
}
