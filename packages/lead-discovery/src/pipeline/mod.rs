//! Discovery, enrichment and review stages plus the orchestrator that
//! drives them.

pub mod discovery;
pub mod orchestrator;
pub mod review_gate;
pub mod scoring;
pub mod worker_pool;

pub use discovery::Discovery;
pub use orchestrator::Orchestrator;
pub use review_gate::{ReviewDecision, ReviewGate};
pub use scoring::{priority_for, score_lead, score_role, GENERAL_CONTACT};
pub use worker_pool::{BatchOutcome, EnrichmentWorkerPool};
