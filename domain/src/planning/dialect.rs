//! Target planning dialects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Planning language a model is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Flat PDDL: no tasks or methods.
    Pddl,
    /// HDDL: tasks and methods as sibling blocks.
    Hddl,
    /// HPDL: methods nested inside their task.
    Hpdl,
}

impl Dialect {
    /// Pick the dialect for a run: the requested one, else HDDL for
    /// hierarchical models and PDDL otherwise.
    pub fn resolve(requested: Option<Dialect>, is_htn: bool) -> Dialect {
        match requested {
            Some(dialect) => dialect,
            None if is_htn => Dialect::Hddl,
            None => Dialect::Pddl,
        }
    }

    /// Extension used for rendered domain/problem files.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Dialect::Pddl => "pddl",
            Dialect::Hddl => "hddl",
            Dialect::Hpdl => "hpdl",
        }
    }

    pub fn is_hierarchical(&self) -> bool {
        !matches!(self, Dialect::Pddl)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Pddl => write!(f, "PDDL"),
            Dialect::Hddl => write!(f, "HDDL"),
            Dialect::Hpdl => write!(f, "HPDL"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pddl" => Ok(Dialect::Pddl),
            "hddl" => Ok(Dialect::Hddl),
            "hpdl" => Ok(Dialect::Hpdl),
            _ => Err(format!("Invalid dialect: {} (expected pddl, hddl or hpdl)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(Dialect::resolve(None, true), Dialect::Hddl);
        assert_eq!(Dialect::resolve(None, false), Dialect::Pddl);
        assert_eq!(Dialect::resolve(Some(Dialect::Hpdl), false), Dialect::Hpdl);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("PDDL".parse::<Dialect>().ok(), Some(Dialect::Pddl));
        assert_eq!("hddl".parse::<Dialect>().ok(), Some(Dialect::Hddl));
        assert_eq!("Hpdl".parse::<Dialect>().ok(), Some(Dialect::Hpdl));
        assert!("strips".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_display_and_extension() {
        assert_eq!(Dialect::Hddl.to_string(), "HDDL");
        assert_eq!(Dialect::Hddl.file_extension(), "hddl");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Dialect::Hpdl).unwrap();
        assert_eq!(json, "\"hpdl\"");
    }
}
