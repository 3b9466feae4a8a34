//! Domain layer for nl2plan
//!
//! This crate contains the parsing and rendering core. It has no
//! dependencies on infrastructure or presentation concerns and performs no
//! I/O.
//!
//! # Core Concepts
//!
//! ## Response parsing
//!
//! A model answers with a markdown document (`# PREDICATES`, `## OUTPUT`,
//! `### Action Effects`, ...). [`markdown`] cuts it into sections and
//! logical expressions; [`parsing`] turns those into typed entities.
//!
//! ## Rendering
//!
//! [`PlanningModel`] holds the most recent extraction and renders it as a
//! PDDL, HDDL or HPDL domain/problem pair ([`Dialect`]).

pub mod config;
pub mod markdown;
pub mod parsing;
pub mod planning;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use markdown::{
    Section, extract_bracket_block, extract_logical_expression, extract_section, split_sections,
};
pub use parsing::{ListMode, ParseError, ParseIssue, Parsed, parse_response};
pub use planning::{
    Action, Dialect, ExtractedModel, Literal, Method, ModelHeader, ObjectList, ParameterList,
    PlanningModel, Predicate, RenderError, Task, TypeDecl, TypeHierarchy,
};
