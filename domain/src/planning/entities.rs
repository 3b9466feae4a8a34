//! Planning entities recovered from model responses.
//!
//! Every record is an immutable value produced by the parsers in
//! [`crate::parsing`] and owned by a [`PlanningModel`](super::model::PlanningModel).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `?name -> type` mapping; iteration order is declaration order.
pub type ParameterList = IndexMap<String, String>;

/// Ordered `object -> type` mapping.
pub type ObjectList = IndexMap<String, String>;

/// Render a parameter list as `?a - t1 ?b - t2`.
pub fn format_parameters(params: &ParameterList) -> String {
    params
        .iter()
        .map(|(name, ty)| format!("{} - {}", name, ty))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical `(name ?p - t): description` rendering shared by predicates and tasks.
pub(crate) fn clean_signature(name: &str, params: &ParameterList, description: &str) -> String {
    let head = if params.is_empty() {
        format!("({})", name)
    } else {
        format!("({} {})", name, format_parameters(params))
    };
    if description.is_empty() {
        head
    } else {
        format!("{}: {}", head, description)
    }
}

/// A typed relation symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub description: String,
    pub params: ParameterList,
    /// Source line with the list marker removed.
    pub raw: String,
    /// `(name ?p - t): description`
    pub clean: String,
}

impl Predicate {
    pub fn new(
        name: impl Into<String>,
        params: ParameterList,
        description: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let description = description.into();
        let clean = clean_signature(&name, &params, &description);
        Self {
            name,
            description,
            params,
            raw: raw.into(),
            clean,
        }
    }

    /// Declaration line for a `(:predicates ...)` block, description as comment.
    pub fn declaration(&self) -> String {
        let head = clean_signature(&self.name, &self.params, "");
        if self.description.is_empty() {
            head
        } else {
            format!("{} ; {}", head, self.description)
        }
    }
}

/// An abstract HTN task with the methods that decompose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub params: ParameterList,
    pub raw: String,
    pub clean: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        params: ParameterList,
        description: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let description = description.into();
        let clean = clean_signature(&name, &params, &description);
        Self {
            name,
            description,
            params,
            raw: raw.into(),
            clean,
            methods: Vec::new(),
        }
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }
}

/// One decomposition of a task into ordered subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub params: ParameterList,
    /// The decomposed task, verbatim (e.g. `(deliver ?p ?l)`).
    pub task: String,
    /// Single parenthesized expression.
    pub ordered_subtasks: String,
    pub raw: String,
}

/// A primitive operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub params: ParameterList,
    /// Single parenthesized expression.
    pub preconditions: String,
    /// Single parenthesized expression.
    pub effects: String,
    pub raw: String,
}

/// Declared parent and description of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub parent: Option<String>,
    pub description: String,
}

/// Names that must not appear in a `(:types ...)` block.
pub const RESERVED_TYPE_NAMES: &[&str] = &["object", "pddl", "lisp"];

/// Ordered `type -> declaration` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHierarchy(IndexMap<String, TypeDecl>);

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, decl: TypeDecl) {
        self.0.insert(name.into(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeDecl)> {
        self.0.iter()
    }

    /// Copy without the [`RESERVED_TYPE_NAMES`].
    pub fn pruned(&self) -> Self {
        self.pruned_of(RESERVED_TYPE_NAMES)
    }

    pub fn pruned_of(&self, reserved: &[&str]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(name, _)| !reserved.contains(&name.as_str()))
                .map(|(name, decl)| (name.clone(), decl.clone()))
                .collect(),
        )
    }

    /// `(:types ...)` lines: `name - parent` or bare `name`.
    pub fn declarations(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(name, decl)| match &decl.parent {
                Some(parent) => format!("{} - {}", name, parent),
                None => name.clone(),
            })
            .collect()
    }
}

/// A ground (or parameterized) atom, possibly negated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub predicate: String,
    pub args: Vec<String>,
    #[serde(default)]
    pub negated: bool,
}

impl Literal {
    pub fn new(predicate: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
            negated: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn atom(&self) -> String {
        if self.args.is_empty() {
            format!("({})", self.predicate)
        } else {
            format!("({} {})", self.predicate, self.args.join(" "))
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "(not {})", self.atom())
        } else {
            write!(f, "{}", self.atom())
        }
    }
}
