//! Structured configuration issues.
//!
//! Loaders and use cases report problems as [`ConfigIssue`] values instead
//! of failing on the first one, so every problem can be shown at once.
//!
//! ```
//! use nl2plan_domain::config::validation::{validate_dialect, has_errors};
//! use nl2plan_domain::Dialect;
//!
//! let issues = validate_dialect(Some(Dialect::Pddl), true);
//! assert_eq!(issues.len(), 1);
//! assert!(!has_errors(&issues));
//! ```

use crate::planning::dialect::Dialect;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field that must name one of a fixed set of values.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A required field is empty.
    EmptyValue { field: String },
    /// `extraction.max_retries` is zero, so no query would ever be made.
    ZeroRetries,
    /// The prompt template has no `{task_desc}` placeholder.
    MissingPlaceholder,
    /// The dialect cannot express the model kind (tasks dropped or absent).
    DialectMismatch { dialect: Dialect, is_htn: bool },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

/// Whether any issue is fatal.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Check a requested dialect against the model kind.
///
/// A hierarchical model rendered as PDDL loses its tasks; a flat model
/// rendered in an HTN dialect has no tasks to show. Both still render.
pub fn validate_dialect(requested: Option<Dialect>, is_htn: bool) -> Vec<ConfigIssue> {
    let Some(dialect) = requested else {
        return Vec::new();
    };
    if dialect.is_hierarchical() == is_htn {
        return Vec::new();
    }
    let message = if is_htn {
        format!("{} cannot express tasks; task and method sections will be dropped", dialect)
    } else {
        format!("{} requested for a non-hierarchical model; no tasks will be rendered", dialect)
    };
    vec![ConfigIssue::warning(
        ConfigIssueCode::DialectMismatch { dialect, is_htn },
        message,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_or_automatic_dialect_is_clean() {
        assert!(validate_dialect(None, true).is_empty());
        assert!(validate_dialect(Some(Dialect::Hddl), true).is_empty());
        assert!(validate_dialect(Some(Dialect::Pddl), false).is_empty());
    }

    #[test]
    fn mismatched_dialect_warns() {
        let issues = validate_dialect(Some(Dialect::Hpdl), false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::DialectMismatch {
                dialect: Dialect::Hpdl,
                is_htn: false
            }
        );
    }

    #[test]
    fn has_errors_only_counts_errors() {
        let warning = ConfigIssue::warning(ConfigIssueCode::MissingPlaceholder, "w");
        let error = ConfigIssue::error(ConfigIssueCode::ZeroRetries, "e");
        assert!(!has_errors(&[warning.clone()]));
        assert!(has_errors(&[warning, error]));
        assert!(!has_errors(&[]));
    }
}
