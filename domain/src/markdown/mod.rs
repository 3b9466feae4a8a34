//! Text-level helpers for markdown-structured model output.

pub mod expression;
pub mod sections;

pub use expression::{extract_logical_expression, find_keyword_block};
pub use sections::{extract_bracket_block, extract_section, split_sections, Section};
