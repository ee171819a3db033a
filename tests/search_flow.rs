//! End-to-end flows through the service facade with a stub provider.

use std::sync::Arc;

use jsearch::config::Config;
use jsearch::embedding::EmbeddingProvider;
use jsearch::error::SearchError;
use jsearch::model::{JobType, NewJob, WorkMode};
use jsearch::search::JobFilters;
use jsearch::service::SearchService;
use jsearch::test_utils::{FailingEmbedder, StubEmbedder};

const DIMS: usize = 256;

fn config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.store.path = dir.path().join("jobs.db");
    config
}

fn stub_service(dir: &tempfile::TempDir) -> SearchService {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(DIMS));
    SearchService::with_provider(config(dir), provider).unwrap()
}

fn new_job(title: &str, location: &str) -> NewJob {
    NewJob {
        title: title.into(),
        description: format!("We are hiring: {title}"),
        salary: None,
        location: location.into(),
        job_type: JobType::FullTime,
        work_mode: WorkMode::Hybrid,
        openings: 2,
        required_skills: vec!["Communication".into()],
        company_id: "acme".into(),
        recruiter_id: "r-7".into(),
    }
}

#[test]
fn test_filter_and_semantic_agree_on_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let service = stub_service(&dir);

    let rust = service
        .create_job(new_job("Senior Rust Developer", "Berlin"))
        .unwrap();
    let chef = service
        .create_job(new_job("Pastry Chef", "Paris"))
        .unwrap();

    // Keyword search sees both immediately, enriched or not
    let page = service.search(&JobFilters::new(), 1, 20).unwrap();
    assert_eq!(page.total, 2);

    // Join the workers so both vectors have landed
    let config = service.config().clone();
    service.close();
    let service = {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(DIMS));
        SearchService::with_provider(config, provider).unwrap()
    };

    let results = service.semantic_search("senior rust developer").unwrap();
    assert_eq!(results[0].job.id, rust.id);
    assert!(results[0].similarity.unwrap() > 0.99);
    assert!(results.iter().all(|r| r.job.id != chef.id));
    service.close();
}

#[test]
fn test_semantic_results_respect_threshold_ordering() {
    let dir = tempfile::tempdir().unwrap();
    let service = stub_service(&dir);

    service
        .create_job(new_job("Software Engineer", "Remote"))
        .unwrap();
    service
        .create_job(new_job("Senior Software Engineer", "Remote"))
        .unwrap();

    let config = service.config().clone();
    service.close();
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(DIMS));
    let service = SearchService::with_provider(config, provider).unwrap();

    let results = service.semantic_search("software engineer").unwrap();
    assert!(results.len() >= 2);
    // Scores are sorted descending
    for pair in results.windows(2) {
        assert!(pair[0].similarity.unwrap() >= pair[1].similarity.unwrap());
    }
    service.close();
}

#[test]
fn test_job_created_during_outage_recovered_by_backfill() {
    let dir = tempfile::tempdir().unwrap();

    // Provider down: creation still succeeds, keyword search still works
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FailingEmbedder);
    let service = SearchService::with_provider(config(&dir), provider).unwrap();
    let job = service
        .create_job(new_job("Data Platform Engineer", "Remote"))
        .unwrap();

    let page = service
        .search(&JobFilters::new().with_keyword("platform"), 1, 20)
        .unwrap();
    assert_eq!(page.total, 1);

    // Semantic search fails outright, no silent fallback
    let err = service.semantic_search("data platform").unwrap_err();
    assert!(matches!(err, SearchError::EmbeddingUnavailable(_)));
    let config = service.config().clone();
    service.close();

    // Provider back: backfill sweeps the gap, semantic search recovers
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(DIMS));
    let service = SearchService::with_provider(config, provider).unwrap();
    let report = service.backfill().unwrap();
    assert_eq!(report.enriched, 1);

    let results = service.semantic_search("data platform engineer").unwrap();
    assert!(results.iter().any(|r| r.job.id == job.id));
    service.close();
}

#[test]
fn test_title_update_triggers_reembedding() {
    let dir = tempfile::tempdir().unwrap();
    let service = stub_service(&dir);

    let mut job = service.create_job(new_job("Old Title", "Remote")).unwrap();
    job.title = "Machine Learning Engineer".into();
    service.update_job(&job).unwrap();

    let config = service.config().clone();
    service.close();
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(DIMS));
    let service = SearchService::with_provider(config, provider).unwrap();

    let loaded = service.db().get_job(&job.id).unwrap().unwrap();
    assert_eq!(
        loaded.embedded_title.as_deref(),
        Some("Machine Learning Engineer")
    );
    service.close();
}

#[test]
fn test_pagination_clamps_out_of_range_values() {
    let dir = tempfile::tempdir().unwrap();
    let service = stub_service(&dir);

    for i in 0..5 {
        service
            .create_job(new_job(&format!("Role {i}"), "Remote"))
            .unwrap();
    }

    // page 0 falls back to 1, an out-of-range limit to the default
    let page = service.search(&JobFilters::new(), 0, 10_000).unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 20);
    assert_eq!(page.total, 5);
    service.close();
}
