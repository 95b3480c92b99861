//! Data types shared by every pipeline stage.

pub mod candidate;
pub mod criteria;
pub mod job;
pub mod lead;
