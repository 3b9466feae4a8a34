//! Planner adapters.

pub mod command;

pub use command::CommandPlanner;
