//! Test harness driving the router in-process with mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use lead_discovery::testing::{
    MockCandidateSource, MockDirectoryResolver, MockPageEnricher, MockPageFetcher,
};
use lead_discovery::{
    Candidate, CandidateSource, Discovery, EnrichmentWorkerPool, Job, JobRegistry, JobStatus,
    Orchestrator, PipelineConfig,
};
use serde_json::Value;
use server_core::{kernel::ServerDeps, server::build_app};
use tower::ServiceExt;

pub struct TestHarness {
    pub app: Router,
    pub registry: JobRegistry,
    pub fetcher: Arc<MockPageFetcher>,
}

impl TestHarness {
    /// Discovery returns `count` candidates; every page yields a director.
    pub fn with_candidates(count: usize) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let candidates: Vec<Candidate> = (0..count)
            .map(|i| {
                Candidate::new(format!("Academy {}", i))
                    .with_website(format!("https://academy{}.example", i))
            })
            .collect();

        let fetcher = Arc::new(candidates.iter().fold(MockPageFetcher::new(), |f, c| {
            f.with_page(c.website.as_deref().unwrap_or_default(), "<html></html>")
        }));
        let enricher = MockPageEnricher::new()
            .with_contacts_for_all(&["office@academy.example"], Some("Activities Director"));

        let config = PipelineConfig::new().with_concurrency(15);
        let source = MockCandidateSource::new("search").with_candidates(candidates);
        let discovery = Discovery::new(vec![Arc::new(source) as Arc<dyn CandidateSource>]);
        let pool = EnrichmentWorkerPool::new(
            fetcher.clone(),
            Arc::new(enricher),
            Arc::new(MockDirectoryResolver::new()),
            &config,
        );

        let registry = JobRegistry::new();
        let deps = ServerDeps::new(Orchestrator::new(registry.clone(), discovery, pool));

        Self {
            app: build_app(deps, &[]),
            registry,
            fetcher,
        }
    }

    /// Send a request and decode the JSON response.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Raw body variant for malformed payloads.
    pub async fn send_raw(&self, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Wait until the job reaches `status`.
    pub async fn wait_for_status(&self, job_id: &str, status: JobStatus) -> Job {
        let mut rx = self.registry.subscribe(job_id).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == status))
            .await
            .expect("job did not reach expected status")
            .unwrap();
        self.registry.get(job_id).await.unwrap()
    }
}
