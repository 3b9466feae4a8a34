//! Parse errors and non-fatal parse issues.

use thiserror::Error;

/// Content errors: the response lacks something the model must provide.
///
/// These are recoverable by asking the model again; the assembler's retry
/// loop catches every variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Could not find the '{section}' section in the output. Provide the entire response, including all headings even if some are unchanged.")]
    MissingSection { section: String },

    #[error("Could not find the '{marker}' section of {entity} '{name}' in the output. Provide the entire response, including all headings even if some are unchanged.")]
    MissingMarker {
        entity: &'static str,
        name: String,
        marker: &'static str,
    },

    #[error("Could not find the logical expression in the output. Provide the entire response, including all headings even if some are unchanged.")]
    NoLogicalExpression,

    #[error("Invalid {entity} '{name}': {reason}")]
    InvalidExpression {
        entity: &'static str,
        name: String,
        reason: String,
    },

    #[error("Empty {entity} heading in the '{section}' section. Provide the entire response, including all headings even if some are unchanged.")]
    UnnamedEntry {
        entity: &'static str,
        section: String,
    },
}

/// A recoverable anomaly found while parsing a declaration list.
///
/// Issues are reported, never fatal: the offending token or line is
/// dropped and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// A non-blank line that is not a list entry.
    UnparseableLine { line: String },
    /// A bare token in parameter position, treated as `?token`.
    ImplicitParameter { entry: String, token: String },
    /// A `?var` token in type position, used as the type anyway.
    SuspiciousType { entry: String, token: String },
    /// Parameters left without a type at the end of a line.
    UntypedParameters { entry: String, params: Vec<String> },
    /// A trailing `-` with no type after it.
    DanglingTypeMarker { entry: String },
    /// An object line with no `- type` part.
    UntypedObject { line: String },
    /// A state line with no predicate name.
    EmptyLiteral { line: String },
    /// A state line holding a compound form other than a plain conjunction.
    CompoundLiteral { line: String },
    /// An action or method without a parameters block.
    MissingParameters { entity: &'static str, name: String },
    /// A task declared without a matching methods section.
    TaskWithoutMethods { task: String },
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseIssue::UnparseableLine { line } => {
                write!(f, "unable to parse the line: \"{}\"", line)
            }
            ParseIssue::ImplicitParameter { entry, token } => write!(
                f,
                "`{}` in `{}` is not correctly formatted, assuming it is a variable name",
                token, entry
            ),
            ParseIssue::SuspiciousType { entry, token } => write!(
                f,
                "`{}` in `{}` is not a valid type for a variable but is treated as one",
                token, entry
            ),
            ParseIssue::UntypedParameters { entry, params } => write!(
                f,
                "{} not followed by a type name in `{}`, discarded",
                params.join(", "),
                entry
            ),
            ParseIssue::DanglingTypeMarker { entry } => {
                write!(f, "the last type is not specified in `{}`, discarded", entry)
            }
            ParseIssue::UntypedObject { line } => {
                write!(f, "object line without a type: \"{}\"", line)
            }
            ParseIssue::EmptyLiteral { line } => {
                write!(f, "state line without a predicate: \"{}\"", line)
            }
            ParseIssue::CompoundLiteral { line } => {
                write!(f, "state line is not a single literal, discarded: \"{}\"", line)
            }
            ParseIssue::MissingParameters { entity, name } => {
                write!(f, "{} '{}' has no parameters block, assuming none", entity, name)
            }
            ParseIssue::TaskWithoutMethods { task } => {
                write!(f, "task '{}' has no methods section", task)
            }
        }
    }
}

/// A parsed value together with the issues found while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub issues: Vec<ParseIssue>,
}

impl<T> Parsed<T> {
    pub fn new(value: T, issues: Vec<ParseIssue>) -> Self {
        Self { value, issues }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed::new(f(self.value), self.issues)
    }

    /// Move the issues into `sink` and return the value.
    pub fn drain_into(self, sink: &mut Vec<ParseIssue>) -> T {
        sink.extend(self.issues);
        self.value
    }
}
