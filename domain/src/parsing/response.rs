//! Whole-response parsing.
//!
//! Expected layout, top-level headings in any order:
//!
//! ```text
//! # TYPES            ## OUTPUT    (optional)
//! # PREDICATES       ## OUTPUT
//! # TASKS            ## OUTPUT    (hierarchical models only)
//! # <task name>      ## <method> per method
//! # ACTIONS          ## <action> per action
//! # OBJECTS          ## OUTPUT
//! # INITIAL          ## OUTPUT
//! # GOAL             ## OUTPUT
//! ```

use super::declarations::{parse_predicates, parse_tasks, ListMode};
use super::error::{ParseError, ParseIssue, Parsed};
use super::state::{parse_goal, parse_initial, parse_objects, parse_types};
use super::structured::{parse_actions, parse_methods};
use crate::markdown::sections::{extract_section, split_sections};
use crate::planning::model::ExtractedModel;

pub const TYPES: &str = "TYPES";
pub const PREDICATES: &str = "PREDICATES";
pub const TASKS: &str = "TASKS";
pub const ACTIONS: &str = "ACTIONS";
pub const OBJECTS: &str = "OBJECTS";
pub const INITIAL: &str = "INITIAL";
pub const GOAL: &str = "GOAL";
const OUTPUT: &str = "OUTPUT";

/// The `## OUTPUT` part of top-level section `title`.
fn output_of<'a>(text: &'a str, title: &str) -> &'a str {
    extract_section(extract_section(text, title, 1), OUTPUT, 2)
}

fn mandatory_output<'a>(text: &'a str, title: &str) -> Result<&'a str, ParseError> {
    let output = output_of(text, title);
    if output.is_empty() {
        return Err(ParseError::MissingSection {
            section: title.to_string(),
        });
    }
    Ok(output)
}

/// Parse a complete model response.
///
/// Fails on the first missing mandatory section or malformed action or
/// method; per-line anomalies are collected as issues.
pub fn parse_response(text: &str, is_htn: bool) -> Result<Parsed<ExtractedModel>, ParseError> {
    let mut issues = Vec::new();

    let types = parse_types(output_of(text, TYPES)).drain_into(&mut issues);
    let predicates = parse_predicates(mandatory_output(text, PREDICATES)?).drain_into(&mut issues);

    let mut tasks = Vec::new();
    if is_htn {
        for task in parse_tasks(mandatory_output(text, TASKS)?).drain_into(&mut issues) {
            let body = extract_section(text, &task.name, 1);
            if body.is_empty() {
                issues.push(ParseIssue::TaskWithoutMethods {
                    task: task.name.clone(),
                });
                tasks.push(task);
                continue;
            }
            let methods =
                parse_methods(&split_sections(body, 2), &task.name)?.drain_into(&mut issues);
            tasks.push(task.with_methods(methods));
        }
    }

    let actions_text = extract_section(text, ACTIONS, 1);
    if actions_text.is_empty() {
        return Err(ParseError::MissingSection {
            section: ACTIONS.to_string(),
        });
    }
    let actions = parse_actions(&split_sections(actions_text, 2))?.drain_into(&mut issues);

    let objects =
        parse_objects(mandatory_output(text, OBJECTS)?, ListMode::Markdown).drain_into(&mut issues);
    let initial =
        parse_initial(mandatory_output(text, INITIAL)?, ListMode::Markdown).drain_into(&mut issues);
    let goal =
        parse_goal(mandatory_output(text, GOAL)?, ListMode::Markdown).drain_into(&mut issues);

    let model = ExtractedModel {
        types,
        predicates,
        tasks,
        actions,
        objects,
        initial,
        goal,
    };
    Ok(Parsed::new(model, issues))
}
