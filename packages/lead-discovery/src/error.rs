//! Typed errors for the lead discovery pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the HTTP layer can
//! map each failure onto a status code.

use thiserror::Error;

use crate::types::job::JobStatus;

/// Errors that end a job run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Discovery produced no candidates at all
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Registry rejected a lifecycle update
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Every batch ran but no candidate yielded contact information
    #[error("No contact information could be extracted from {attempted} organizations. Try a broader search or a different location.")]
    NoLeadsFound { attempted: usize },

    /// The background task panicked or was aborted
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised while discovering candidates.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Every strategy came back empty
    #[error("No organizations found for \"{query}\". Try including a US state or a more specific organization type.")]
    NoOrganizationsFound { query: String },

    /// A single provider failed (swallowed by the discovery composite)
    #[error("{provider} provider failed: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors raised while fetching pages or resolving directory entries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Request exceeded its time budget
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Response could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors raised by the job registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No job with this id
    #[error("Job not found: {0}")]
    NotFound(String),

    /// The state machine forbids this transition
    #[error("invalid transition for job {job_id}: {from} -> {to}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        to: JobStatus,
    },

    /// The request conflicts with the job's current state
    #[error("{0}")]
    Conflict(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for discovery providers.
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
