//! Collaborator seams consumed by the pipeline.
//!
//! - [`source::CandidateSource`] - finds candidate organizations
//! - [`resolver::DirectoryResolver`] - turns a directory entry into a website
//! - [`fetcher::PageFetcher`] - downloads a candidate page
//! - [`enricher::PageEnricher`] - pulls contact data out of a page

pub mod enricher;
pub mod fetcher;
pub mod resolver;
pub mod source;
