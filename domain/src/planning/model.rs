//! The aggregate a successful extraction produces.

use super::dialect::Dialect;
use super::entities::{Action, Literal, ObjectList, Predicate, Task, TypeHierarchy};
use super::render::{self, RenderError};
use serde::{Deserialize, Serialize};

/// Everything recovered from one well-formed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedModel {
    pub types: TypeHierarchy,
    pub predicates: Vec<Predicate>,
    /// Empty unless the model is hierarchical.
    pub tasks: Vec<Task>,
    pub actions: Vec<Action>,
    pub objects: ObjectList,
    pub initial: Vec<Literal>,
    pub goal: Vec<Literal>,
}

/// Names and flags fixed when a run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHeader {
    pub domain_name: String,
    pub problem_name: String,
    /// Requirement tokens as written, e.g. `:strips`.
    pub requirements: Vec<String>,
    pub is_htn: bool,
}

impl ModelHeader {
    pub fn new(domain_name: impl Into<String>, problem_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            problem_name: problem_name.into(),
            requirements: Vec::new(),
            is_htn: false,
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_htn(mut self, is_htn: bool) -> Self {
        self.is_htn = is_htn;
        self
    }
}

/// Header plus the most recent successful extraction.
///
/// The extracted part is only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningModel {
    header: ModelHeader,
    extracted: Option<ExtractedModel>,
}

impl PlanningModel {
    pub fn new(header: ModelHeader) -> Self {
        Self {
            header,
            extracted: None,
        }
    }

    pub fn header(&self) -> &ModelHeader {
        &self.header
    }

    pub fn extracted(&self) -> Option<&ExtractedModel> {
        self.extracted.as_ref()
    }

    pub fn replace(&mut self, extracted: ExtractedModel) {
        self.extracted = Some(extracted);
    }

    pub fn dialect(&self, requested: Option<Dialect>) -> Dialect {
        Dialect::resolve(requested, self.header.is_htn)
    }

    pub fn render_domain(&self, requested: Option<Dialect>) -> Result<String, RenderError> {
        let extracted = self.extracted.as_ref().ok_or(RenderError::NotExtracted)?;
        Ok(render::render_domain(
            &self.header,
            extracted,
            self.dialect(requested),
        ))
    }

    pub fn render_problem(&self, requested: Option<Dialect>) -> Result<String, RenderError> {
        let extracted = self.extracted.as_ref().ok_or(RenderError::NotExtracted)?;
        Ok(render::render_problem(
            &self.header,
            extracted,
            self.dialect(requested),
        ))
    }
}
