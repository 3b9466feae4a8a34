//! Planner port
//!
//! An external planner consumes a rendered domain/problem file pair and
//! returns a plan.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while solving
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The planner ran but reported that no plan exists.
    #[error("No plan found: {0}")]
    NoPlan(String),

    /// The planner rejected its input or crashed.
    #[error("Planner failed: {0}")]
    Failed(String),

    #[error("Planner timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to launch planner: {0}")]
    Launch(#[from] std::io::Error),
}

impl PlannerError {
    pub fn is_no_plan(&self) -> bool {
        matches!(self, PlannerError::NoPlan(_))
    }
}

/// Solves planning problems from files on disk.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Human-readable identifier used in logs
    fn name(&self) -> &str;

    /// Solve the problem at `problem_path` against the domain at `domain_path`
    async fn solve(&self, domain_path: &Path, problem_path: &Path) -> Result<String, PlannerError>;
}
