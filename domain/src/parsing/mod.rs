//! Entity parsers.
//!
//! Each parser turns one isolated section into typed records and a list of
//! [`ParseIssue`]s. Only missing structure is an error; malformed lines
//! are reported and skipped.

pub mod declarations;
pub mod error;
pub mod response;
pub mod state;
pub mod structured;

pub use declarations::{parse_predicates, parse_tasks, ListMode};
pub use error::{ParseError, ParseIssue, Parsed};
pub use response::parse_response;
pub use structured::{parse_action, parse_method};
