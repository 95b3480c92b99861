//! Lead Discovery & Enrichment Pipeline
//!
//! Turns a free-text audience description ("high schools in Michigan") into
//! organizations with verified contact information and an outreach priority.
//!
//! # Flow
//!
//! ```text
//! prompt ─► extract_criteria ─► Discovery (directory, then web search)
//!        ─► loop { EnrichmentWorkerPool batch ─► ReviewGate } ─► completed
//! ```
//!
//! Every job runs as one detached task. Batches are processed strictly in
//! order and each batch that produced leads waits for human approval before
//! the next one starts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lead_discovery::{Discovery, EnrichmentWorkerPool, JobRegistry, Orchestrator, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let registry = JobRegistry::new();
//! let discovery = Discovery::new(vec![directory, search]).with_max_candidates(config.max_candidates);
//! let pool = EnrichmentWorkerPool::new(fetcher, enricher, resolver, &config);
//! let orchestrator = Orchestrator::new(registry.clone(), discovery, pool);
//!
//! let job = orchestrator.submit("high schools in Michigan").await;
//! // later: registry.approve_batch(&job.id, pending).await?;
//! ```
//!
//! # Modules
//!
//! - [`criteria`] - Prompt to structured criteria
//! - [`pipeline`] - Discovery, worker pool, scoring, review gate, orchestrator
//! - [`registry`] - Job state machine and snapshots
//! - [`providers`] - HTTP implementations of the collaborator traits
//! - [`traits`] - Collaborator seams
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod criteria;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::PipelineConfig;
pub use criteria::extract_criteria;
pub use error::{DiscoveryError, FetchError, PipelineError, RegistryError};
pub use pipeline::{
    BatchOutcome, Discovery, EnrichmentWorkerPool, Orchestrator, ReviewDecision, ReviewGate,
};
pub use registry::JobRegistry;
pub use traits::{
    enricher::PageEnricher, fetcher::PageFetcher, resolver::DirectoryResolver,
    source::CandidateSource,
};
pub use types::{
    candidate::Candidate,
    criteria::{OrganizationType, SearchCriteria},
    job::{EnrichmentStats, Job, JobStatus},
    lead::{BestContact, Lead, PageContacts, Priority},
};

pub use providers::{
    ContactPageEnricher, HttpDirectoryResolver, HttpDirectorySource, HttpPageFetcher,
    TavilySearchSource,
};
