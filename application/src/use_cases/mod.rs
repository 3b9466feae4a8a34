//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assemble_model;
pub mod run_batch;
pub mod run_pipeline;
