//! Pipeline configuration from TOML (`[pipeline]` section)

use nl2plan_domain::{ConfigIssue, ConfigIssueCode, Dialect};
use serde::{Deserialize, Serialize};

/// Raw pipeline configuration from TOML
///
/// # Example
///
/// ```toml
/// [pipeline]
/// domain_name = "blocksworld"
/// problem_name = "stack-three"
/// requirements = [":strips", ":typing", ":negative-preconditions"]
/// htn = false
/// dialect = "pddl"              # "pddl", "hddl" or "hpdl"; omit to follow `htn`
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    pub domain_name: String,
    pub problem_name: String,
    pub requirements: Vec<String>,
    /// Extract tasks and methods as well as actions
    pub htn: bool,
    pub dialect: Option<String>,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            domain_name: "domain_placeholder".to_string(),
            problem_name: "problem_placeholder".to_string(),
            requirements: vec![":strips".to_string(), ":typing".to_string()],
            htn: false,
            dialect: None,
        }
    }
}

impl FilePipelineConfig {
    /// Parse the dialect string, returning an error issue on failure.
    ///
    /// An unknown value falls back to the dialect implied by `htn`.
    pub fn parse_dialect(&self) -> (Option<Dialect>, Vec<ConfigIssue>) {
        let Some(raw) = &self.dialect else {
            return (None, vec![]);
        };
        match raw.parse::<Dialect>() {
            Ok(dialect) => (Some(dialect), vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "pipeline.dialect".to_string(),
                        value: raw.clone(),
                        valid_values: vec![
                            "pddl".to_string(),
                            "hddl".to_string(),
                            "hpdl".to_string(),
                        ],
                    },
                    format!("pipeline.dialect: unknown value '{}'", raw),
                );
                (None, vec![issue])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect() {
        let config = FilePipelineConfig {
            dialect: Some("HPDL".into()),
            ..Default::default()
        };
        assert_eq!(config.parse_dialect(), (Some(Dialect::Hpdl), vec![]));
        assert_eq!(FilePipelineConfig::default().parse_dialect(), (None, vec![]));
    }

    #[test]
    fn test_parse_dialect_unknown() {
        let config = FilePipelineConfig {
            dialect: Some("strips".into()),
            ..Default::default()
        };
        let (dialect, issues) = config.parse_dialect();
        assert_eq!(dialect, None);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "pipeline.dialect"
        ));
    }
}
