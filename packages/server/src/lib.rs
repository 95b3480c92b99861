// Lead Discovery API - server core
//
// HTTP surface over the lead_discovery pipeline: job submission, polling,
// batch approval and cancellation. Jobs live in memory for the lifetime of
// the process.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
