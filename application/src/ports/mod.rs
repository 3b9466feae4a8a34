//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod artifact_store;
pub mod conversation_logger;
pub mod language_model;
pub mod planner;
pub mod progress;
