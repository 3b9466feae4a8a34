//! Language model adapters.

pub mod canned;
pub mod command;

pub use canned::CannedModel;
pub use command::CommandModel;
