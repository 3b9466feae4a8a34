//! Declaration-list grammar shared by predicates, tasks and parameter blocks.
//!
//! A declaration list is one entry per line:
//!
//! ```text
//! 1. on ?a ?b - block: block ?a sits on block ?b
//! - (holding ?b - block): the hand holds ?b
//! * clear ?b - block
//! ```
//!
//! The head before `": "` (or a `;` comment) holds the entity name followed
//! by typed parameters; anything after it is a free-text description.

use super::error::{ParseIssue, Parsed};
use crate::planning::entities::{ParameterList, Predicate, Task};
use indexmap::IndexMap;

/// Whitespace and marker tolerance of list parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Indented entries are accepted.
    #[default]
    Markdown,
    /// The list marker must be in column 0.
    Strict,
}

/// One accepted declaration line, before it becomes an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub params: ParameterList,
    pub description: String,
    pub raw: String,
}

/// Strip a list marker (`-`, `*`, `N.`) from `line`.
///
/// Entries opening with `(` are accepted as-is. Returns `None` for lines
/// that are not list entries.
pub fn strip_list_marker(line: &str, mode: ListMode) -> Option<&str> {
    let line = match mode {
        ListMode::Markdown => line.trim_start(),
        ListMode::Strict => line,
    };

    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        return Some(rest.trim());
    }
    if line.starts_with('(') {
        return Some(line.trim());
    }
    let (ordinal, rest) = line.split_once('.')?;
    let ordinal = ordinal.trim();
    (!ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit())).then(|| rest.trim())
}

/// Split an entry into `(head, description)` at the first `": "` or `;`.
fn split_description(entry: &str) -> (&str, &str) {
    let colon = entry.find(": ").map(|i| (i, 2));
    let comment = entry.find(';').map(|i| (i, 1));
    let cut = match (colon, comment) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    match cut {
        Some((at, len)) => (&entry[..at], entry[at + len..].trim()),
        None => (entry, ""),
    }
}

fn head_tokens(head: &str) -> Vec<&str> {
    head.trim()
        .trim_end_matches(':')
        .split_whitespace()
        .map(|token| token.trim_matches(['(', ')', '`']))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Bind `?name ... - type` tokens into an ordered parameter list.
///
/// - `?x` opens a pending parameter; several may be pending at once.
/// - `-` announces that the next token is the type of every pending name.
/// - A bare token while no type is announced is taken as `?token`.
/// - Pending names or a `-` left at the end are dropped.
pub fn bind_parameters(tokens: &[&str], entry: &str) -> Parsed<ParameterList> {
    let mut params = ParameterList::new();
    let mut issues = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut expect_type = false;

    for token in tokens {
        if expect_type {
            if token.starts_with('?') {
                issues.push(ParseIssue::SuspiciousType {
                    entry: entry.to_string(),
                    token: token.to_string(),
                });
            }
            for name in pending.drain(..) {
                params.insert(name, token.to_string());
            }
            expect_type = false;
        } else if *token == "-" {
            expect_type = true;
        } else if token.starts_with('?') {
            pending.push(token.to_string());
        } else {
            issues.push(ParseIssue::ImplicitParameter {
                entry: entry.to_string(),
                token: token.to_string(),
            });
            pending.push(format!("?{}", token));
        }
    }

    if expect_type {
        issues.push(ParseIssue::DanglingTypeMarker {
            entry: entry.to_string(),
        });
    }
    if !pending.is_empty() {
        issues.push(ParseIssue::UntypedParameters {
            entry: entry.to_string(),
            params: pending,
        });
    }

    Parsed::new(params, issues)
}

/// Parse a single list entry (marker already removed) into a [`Declaration`].
///
/// Returns `None` when the entry has no name token.
pub fn parse_declaration(entry: &str) -> Option<Parsed<Declaration>> {
    let (head, description) = split_description(entry);
    let tokens = head_tokens(head);
    let (name, rest) = tokens.split_first()?;

    let raw = entry.trim().trim_matches('`').to_string();
    Some(bind_parameters(rest, &raw).map(|params| Declaration {
        name: name.to_string(),
        params,
        description: description.to_string(),
        raw,
    }))
}

/// Parse every declaration line of `text`.
pub fn parse_declarations(text: &str, mode: ListMode) -> Parsed<Vec<Declaration>> {
    let mut declarations = Vec::new();
    let mut issues = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with("```") {
            continue;
        }
        let parsed = strip_list_marker(line, mode).and_then(parse_declaration);
        match parsed {
            Some(parsed) => declarations.push(parsed.drain_into(&mut issues)),
            None => issues.push(ParseIssue::UnparseableLine {
                line: line.to_string(),
            }),
        }
    }

    Parsed::new(declarations, issues)
}

/// Parse a predicate list.
pub fn parse_predicates(text: &str) -> Parsed<Vec<Predicate>> {
    parse_declarations(text, ListMode::Markdown).map(|declarations| {
        declarations
            .into_iter()
            .map(|d| Predicate::new(d.name, d.params, d.description, d.raw))
            .collect()
    })
}

/// Parse a task list. A repeated task name replaces the earlier entry in place.
pub fn parse_tasks(text: &str) -> Parsed<Vec<Task>> {
    parse_declarations(text, ListMode::Markdown).map(|declarations| {
        let mut tasks: IndexMap<String, Task> = IndexMap::new();
        for d in declarations {
            let task = Task::new(d.name.clone(), d.params, d.description, d.raw);
            tasks.insert(d.name, task);
        }
        tasks.into_values().collect()
    })
}

/// Parse a parameter block (`- ?b - block: the block`) into one mapping.
///
/// Entries carry no entity name; every head token goes through
/// [`bind_parameters`]. Later entries for the same name overwrite earlier ones.
pub fn parse_parameter_block(text: &str) -> Parsed<ParameterList> {
    let mut params = ParameterList::new();
    let mut issues = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with("```") {
            continue;
        }
        let Some(entry) = strip_list_marker(line, ListMode::Markdown) else {
            issues.push(ParseIssue::UnparseableLine {
                line: line.to_string(),
            });
            continue;
        };
        let (head, _) = split_description(entry);
        let tokens = head_tokens(head);
        params.extend(bind_parameters(&tokens, entry.trim()).drain_into(&mut issues));
    }

    Parsed::new(params, issues)
}
