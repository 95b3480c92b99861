//! End-to-end pipeline runs against mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use lead_discovery::testing::{
    MockCandidateSource, MockDirectoryResolver, MockPageEnricher, MockPageFetcher,
};
use lead_discovery::{
    Candidate, CandidateSource, Discovery, EnrichmentWorkerPool, Job, JobRegistry, JobStatus,
    Orchestrator, PipelineConfig, Priority,
};

const WAIT: Duration = Duration::from_secs(5);

fn candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| {
            Candidate::new(format!("School {}", i)).with_website(format!("https://school{}.example", i))
        })
        .collect()
}

fn fetcher_for(candidates: &[Candidate]) -> MockPageFetcher {
    candidates
        .iter()
        .filter_map(|c| c.website.as_deref())
        .fold(MockPageFetcher::new(), |fetcher, url| {
            fetcher.with_page(url, "<html><body>Staff</body></html>")
        })
}

struct Harness {
    orchestrator: Orchestrator,
    registry: JobRegistry,
    fetcher: Arc<MockPageFetcher>,
}

fn harness(
    sources: Vec<Arc<dyn CandidateSource>>,
    fetcher: MockPageFetcher,
    enricher: MockPageEnricher,
    resolver: MockDirectoryResolver,
) -> Harness {
    let config = PipelineConfig::new().with_concurrency(15);
    let registry = JobRegistry::new();
    let fetcher = Arc::new(fetcher);
    let pool = EnrichmentWorkerPool::new(
        fetcher.clone(),
        Arc::new(enricher),
        Arc::new(resolver),
        &config,
    );
    let discovery = Discovery::new(sources).with_max_candidates(config.max_candidates);

    Harness {
        orchestrator: Orchestrator::new(registry.clone(), discovery, pool),
        registry,
        fetcher,
    }
}

fn search_returning(candidates: Vec<Candidate>) -> Vec<Arc<dyn CandidateSource>> {
    vec![Arc::new(MockCandidateSource::new("search").with_candidates(candidates)) as Arc<dyn CandidateSource>]
}

/// Wait until the job reaches `status`, then return its snapshot.
async fn wait_for_status(registry: &JobRegistry, job_id: &str, status: JobStatus) -> Job {
    let mut rx = registry.subscribe(job_id).await.unwrap();
    tokio::time::timeout(WAIT, rx.wait_for(|s| *s == status))
        .await
        .unwrap_or_else(|_| panic!("job never reached {}", status))
        .unwrap();
    registry.get(job_id).await.unwrap()
}

fn assert_pending_consistent(job: &Job) {
    if job.status != JobStatus::AwaitingReview {
        assert!(job.pending_results.is_empty(), "pending results outside review: {:?}", job.status);
    }
}

#[tokio::test]
async fn test_no_organizations_fails_job() {
    let sources = vec![
        Arc::new(MockCandidateSource::new("directory").directory_only()) as Arc<dyn CandidateSource>,
        Arc::new(MockCandidateSource::new("search")) as Arc<dyn CandidateSource>,
    ];
    let h = harness(
        sources,
        MockPageFetcher::new(),
        MockPageEnricher::new(),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("find high schools in Wyoming").await;
    assert_eq!(job.status, JobStatus::Pending);

    let job = wait_for_status(&h.registry, &job.id, JobStatus::Failed).await;
    assert!(job.error.as_deref().unwrap().contains("No organizations found"));
    assert_eq!(job.criteria.as_ref().unwrap().location.as_deref(), Some("Wyoming"));
    assert!(job.results.is_empty());
    assert_pending_consistent(&job);
    assert_eq!(h.fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_crashed_run_is_recorded_as_failed() {
    let h = harness(
        vec![Arc::new(MockCandidateSource::new("search").panicking()) as Arc<dyn CandidateSource>],
        MockPageFetcher::new(),
        MockPageEnricher::new(),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("high schools in Ohio").await;
    let job = wait_for_status(&h.registry, &job.id, JobStatus::Failed).await;

    let error = job.error.as_deref().unwrap();
    assert!(error.starts_with("internal error"), "unexpected error: {}", error);
    assert!(job.results.is_empty());
    assert_pending_consistent(&job);
    assert_eq!(h.fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_approval_keeps_scored_leads_and_rejects_repeats() {
    let found = candidates(2);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new().with_contacts_for_all(&["ad@school.example"], Some("Athletic Director")),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("high schools in Ohio").await;
    let pending = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview)
        .await
        .pending_results;

    let repeated = vec![pending[0].clone(), pending[0].clone()];
    assert!(h.registry.approve_batch(&job.id, repeated).await.is_err());

    let mut edited = pending[0].clone();
    edited.estimated_value = 999_999;
    edited.emails = vec!["someone@elsewhere.example".to_string()];
    h.registry.approve_batch(&job.id, vec![edited]).await.unwrap();

    let done = wait_for_status(&h.registry, &job.id, JobStatus::Completed).await;
    assert_eq!(done.results, vec![pending[0].clone()]);
    assert_eq!(done.results[0].estimated_value, 15_000);
}

#[tokio::test]
async fn test_single_batch_scored_and_completed_after_approval() {
    let found = candidates(2);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new().with_contacts_for_all(&["ad@school.example"], Some("Athletic Director")),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("high schools in Ohio").await;
    let job = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview).await;

    assert_eq!(job.pending_results.len(), 2);
    assert_eq!(job.total_leads, 2);
    assert_eq!(job.processed_leads, 2);
    assert!(job.results.is_empty());

    let lead = &job.pending_results[0];
    assert_eq!(lead.estimated_value, 15_000);
    assert_eq!(lead.probability, 40);
    assert_eq!(lead.priority, Priority::High);
    assert_eq!(lead.contact, "Athletic Director");
    assert_eq!(lead.state.as_deref(), Some("Ohio"));

    let approved = h
        .registry
        .approve_batch(&job.id, job.pending_results.clone())
        .await
        .unwrap();
    assert_eq!(approved.status, JobStatus::Completed);

    let job = wait_for_status(&h.registry, &job.id, JobStatus::Completed).await;
    assert_eq!(job.results.len(), 2);
    assert_eq!(job.progress, 100.0);
    assert_eq!(job.prompt, "high schools in Ohio (2 leads found)");
    assert_pending_consistent(&job);
}

#[tokio::test]
async fn test_twenty_candidates_form_two_reviewed_batches() {
    let found = candidates(20);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new().with_contacts_for_all(&["coach@school.example"], Some("Head Coach")),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("colleges with esports programs").await;

    let first = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview).await;
    assert_eq!(first.pending_results.len(), 15);
    assert_eq!(first.processed_leads, 15);
    assert_eq!(first.stats.batches, 1);
    assert!(first.progress < 100.0);
    assert_eq!(h.fetcher.call_count(), 15);

    let resumed = h
        .registry
        .approve_batch(&job.id, first.pending_results.clone())
        .await
        .unwrap();
    assert_eq!(resumed.status, JobStatus::Processing);
    assert_pending_consistent(&resumed);

    let second = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview).await;
    assert_eq!(second.pending_results.len(), 5);
    assert_eq!(second.processed_leads, 20);
    assert_eq!(second.results.len(), 15);
    assert!(second.progress >= first.progress);

    h.registry
        .approve_batch(&job.id, second.pending_results.clone())
        .await
        .unwrap();

    let done = wait_for_status(&h.registry, &job.id, JobStatus::Completed).await;
    assert_eq!(done.results.len(), 20);
    assert_eq!(done.stats.batches, 2);
    assert_eq!(done.stats.attempted, 20);
    assert_eq!(done.stats.succeeded, 20);
    assert_eq!(done.results[0].priority, Priority::Medium);
    assert_eq!(h.fetcher.call_count(), 20);
}

#[tokio::test]
async fn test_cancel_during_review_stops_enrichment() {
    let found = candidates(20);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new().with_contacts_for_all(&["office@school.example"], None),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("high schools in Texas").await;
    wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview).await;

    let cancelled = h.registry.cancel(&job.id).await.unwrap();
    assert_eq!(cancelled.status, JobStatus::Failed);
    assert_pending_consistent(&cancelled);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let job = h.registry.get(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.is_some());
    assert_eq!(job.processed_leads, 15);
    assert_eq!(h.fetcher.call_count(), 15);
}

#[tokio::test]
async fn test_partial_approval_keeps_only_approved_leads() {
    let found = candidates(3);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new().with_contacts_for_all(&["info@school.example"], Some("Principal")),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("high schools in Iowa").await;
    let pending = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview)
        .await
        .pending_results;

    h.registry
        .approve_batch(&job.id, pending[..1].to_vec())
        .await
        .unwrap();

    let done = wait_for_status(&h.registry, &job.id, JobStatus::Completed).await;
    assert_eq!(done.results, pending[..1].to_vec());
    assert_eq!(done.prompt, "high schools in Iowa (1 lead found)");
}

#[tokio::test]
async fn test_no_contacts_anywhere_fails_job() {
    let found = candidates(4);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new(),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("universities in Utah").await;
    let job = wait_for_status(&h.registry, &job.id, JobStatus::Failed).await;

    assert!(job.error.as_deref().unwrap().contains("No contact information"));
    assert_eq!(job.processed_leads, 4);
    assert_eq!(job.stats.attempted, 4);
    assert_eq!(job.stats.succeeded, 0);
}

#[tokio::test]
async fn test_empty_batches_skip_review() {
    // First batch finds nothing, second batch has contacts.
    let found = candidates(16);
    let h = harness(
        search_returning(found.clone()),
        fetcher_for(&found),
        MockPageEnricher::new().with_contacts("https://school15.example", &["hi@school15.example"], None),
        MockDirectoryResolver::new(),
    );

    let job = h.orchestrator.submit("high schools in Maine").await;
    let review = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview).await;

    assert_eq!(review.stats.batches, 2);
    assert_eq!(review.processed_leads, 16);
    assert_eq!(review.pending_results.len(), 1);
    assert_eq!(review.pending_results[0].name, "School 15");
    assert_eq!(review.pending_results[0].contact, "General Contact");
}

#[tokio::test]
async fn test_directory_entries_resolved_before_enrichment() {
    let entry = Candidate::new("Cheyenne East High")
        .with_directory_ref("https://dir.example/wyoming/cheyenne-east")
        .with_state("Wyoming");
    let sources = vec![
        Arc::new(
            MockCandidateSource::new("directory")
                .directory_only()
                .with_candidates(vec![entry]),
        ) as Arc<dyn CandidateSource>,
        Arc::new(MockCandidateSource::new("search").with_candidates(candidates(3))) as Arc<dyn CandidateSource>,
    ];
    let h = harness(
        sources,
        MockPageFetcher::new().with_page("https://east.example", "<html></html>"),
        MockPageEnricher::new().with_contacts("https://east.example", &["ad@east.example"], Some("Athletic Director")),
        MockDirectoryResolver::new()
            .with_link("https://dir.example/wyoming/cheyenne-east", "https://east.example"),
    );

    let job = h.orchestrator.submit("high schools in Wyoming").await;
    let review = wait_for_status(&h.registry, &job.id, JobStatus::AwaitingReview).await;

    assert_eq!(review.total_leads, 1);
    assert_eq!(review.pending_results[0].website, "https://east.example");
    assert_eq!(h.fetcher.fetched_urls(), vec!["https://east.example".to_string()]);
}
