//! Action and method bodies.
//!
//! Both are `## name` sections whose body carries fixed marker lines:
//!
//! ```text
//! ## pick-up
//! ### Action Parameters
//! - ?b - block: the block to pick up
//! ### Action Preconditions
//! (and (clear ?b) (handempty))
//! ### Action Effects
//! (and (holding ?b) (not (clear ?b)))
//! ```

use super::declarations::parse_parameter_block;
use super::error::{ParseError, ParseIssue, Parsed};
use crate::markdown::expression::extract_logical_expression;
use crate::markdown::sections::{labeled_block, Section};
use crate::planning::entities::{Action, Method, ParameterList};

pub const ACTION_PARAMETERS: &str = "Action Parameters";
pub const ACTION_PRECONDITIONS: &str = "Action Preconditions";
pub const ACTION_EFFECTS: &str = "Action Effects";
pub const METHOD_PARAMETERS: &str = "Method Parameters";
pub const METHOD_TASK: &str = "Method Task";
pub const METHOD_ORDERED_SUBTASKS: &str = "Method Ordered Subtasks";

const MARKERS: [&str; 6] = [
    ACTION_PARAMETERS,
    ACTION_PRECONDITIONS,
    ACTION_EFFECTS,
    METHOD_PARAMETERS,
    METHOD_TASK,
    METHOD_ORDERED_SUBTASKS,
];

fn parameters(
    body: &str,
    marker: &str,
    entity: &'static str,
    name: &str,
    issues: &mut Vec<ParseIssue>,
) -> ParameterList {
    match labeled_block(body, marker, &MARKERS) {
        Some(block) => parse_parameter_block(&block).drain_into(issues),
        None => {
            issues.push(ParseIssue::MissingParameters {
                entity,
                name: name.to_string(),
            });
            ParameterList::new()
        }
    }
}

fn required_block(
    body: &str,
    marker: &'static str,
    entity: &'static str,
    name: &str,
) -> Result<String, ParseError> {
    labeled_block(body, marker, &MARKERS).ok_or_else(|| ParseError::MissingMarker {
        entity,
        name: name.to_string(),
        marker,
    })
}

/// Parse the body of one `## <action>` section.
pub fn parse_action(body: &str, name: &str) -> Result<Parsed<Action>, ParseError> {
    let mut issues = Vec::new();
    let params = parameters(body, ACTION_PARAMETERS, "action", name, &mut issues);

    let preconditions = extract_logical_expression(&required_block(
        body,
        ACTION_PRECONDITIONS,
        "action",
        name,
    )?)?;
    let effects =
        extract_logical_expression(&required_block(body, ACTION_EFFECTS, "action", name)?)?;

    let action = Action {
        name: name.to_string(),
        params,
        preconditions,
        effects,
        raw: body.to_string(),
    };
    Ok(Parsed::new(action, issues))
}

/// Parse every `## <action>` section, in order.
pub fn parse_actions(sections: &[Section]) -> Result<Parsed<Vec<Action>>, ParseError> {
    let mut issues = Vec::new();
    let mut actions = Vec::with_capacity(sections.len());
    for section in sections {
        if section.heading.is_empty() {
            return Err(ParseError::UnnamedEntry {
                entity: "action",
                section: "ACTIONS".to_string(),
            });
        }
        actions.push(parse_action(&section.body, &section.heading)?.drain_into(&mut issues));
    }
    Ok(Parsed::new(actions, issues))
}

/// Parse the body of one `## <method>` section.
///
/// The method task is kept verbatim; only the ordered subtasks go through
/// [`extract_logical_expression`].
pub fn parse_method(body: &str, name: &str) -> Result<Parsed<Method>, ParseError> {
    let mut issues = Vec::new();
    let params = parameters(body, METHOD_PARAMETERS, "method", name, &mut issues);

    let task = required_block(body, METHOD_TASK, "method", name)?;
    if task.is_empty() {
        return Err(ParseError::InvalidExpression {
            entity: "method",
            name: name.to_string(),
            reason: format!("the '{}' block is empty", METHOD_TASK),
        });
    }
    let ordered_subtasks = extract_logical_expression(&required_block(
        body,
        METHOD_ORDERED_SUBTASKS,
        "method",
        name,
    )?)?;

    let method = Method {
        name: name.to_string(),
        params,
        task,
        ordered_subtasks,
        raw: body.to_string(),
    };
    Ok(Parsed::new(method, issues))
}

/// Parse the `## <method>` sections of one task, in order.
pub fn parse_methods(sections: &[Section], task: &str) -> Result<Parsed<Vec<Method>>, ParseError> {
    let mut issues = Vec::new();
    let mut methods = Vec::with_capacity(sections.len());
    for section in sections {
        if section.heading.is_empty() {
            return Err(ParseError::UnnamedEntry {
                entity: "method",
                section: task.to_string(),
            });
        }
        methods.push(parse_method(&section.body, &section.heading)?.drain_into(&mut issues));
    }
    Ok(Parsed::new(methods, issues))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PICK_UP: &str = "\
### Action Parameters
```
- ?b - block: the block to pick up
```
### Action Preconditions
```
(and
    (clear ?b)
    (handempty)
)
```
### Action Effects
Picking up clears the hand:
```
(and (holding ?b) (not (clear ?b)) (not (handempty)))
```
";

    #[test]
    fn test_parse_action() {
        let parsed = parse_action(PICK_UP, "pick-up").unwrap();
        assert!(parsed.issues.is_empty());
        let action = parsed.value;
        assert_eq!(action.name, "pick-up");
        assert_eq!(action.params["?b"], "block");
        assert_eq!(action.preconditions, "(and\n    (clear ?b)\n    (handempty)\n)");
        assert_eq!(
            action.effects,
            "(and (holding ?b) (not (clear ?b)) (not (handempty)))"
        );
    }

    #[test]
    fn test_parse_action_with_bold_markers() {
        let body = "\
**Action Parameters**
- ?b - block
**Action Preconditions**
(clear ?b)
**Action Effects**
(holding ?b)
";
        let parsed = parse_action(body, "pick").unwrap();
        assert!(parsed.issues.is_empty());
        let action = parsed.value;
        assert_eq!(action.params.len(), 1);
        assert_eq!(action.params["?b"], "block");
        assert_eq!(action.preconditions, "(clear ?b)");
        assert_eq!(action.effects, "(holding ?b)");
    }

    #[test]
    fn test_parse_method_with_bare_markers() {
        let body = "\
Method Parameters:
- ?p - package
Method Task:
(deliver ?p)
Method Ordered Subtasks:
(and (load ?p) (unload ?p))
";
        let parsed = parse_method(body, "deliver-direct").unwrap();
        assert!(parsed.issues.is_empty());
        assert_eq!(parsed.value.task, "(deliver ?p)");
        assert_eq!(parsed.value.ordered_subtasks, "(and (load ?p) (unload ?p))");
    }

    #[test]
    fn test_missing_effects_marker() {
        let body = PICK_UP.replace("### Action Effects", "### Results");
        let err = parse_action(&body, "pick-up").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingMarker {
                entity: "action",
                name: "pick-up".into(),
                marker: ACTION_EFFECTS,
            }
        );
    }

    #[test]
    fn test_effects_without_expression() {
        let body = "### Action Preconditions\n(clear ?b)\n### Action Effects\nnothing happens\n";
        let err = parse_action(body, "noop").unwrap_err();
        assert_eq!(err, ParseError::NoLogicalExpression);
    }

    #[test]
    fn test_missing_parameters_is_an_issue() {
        let body = "### Action Preconditions\n(clear ?b)\n### Action Effects\n(holding ?b)\n";
        let parsed = parse_action(body, "grab").unwrap();
        assert!(parsed.value.params.is_empty());
        assert_eq!(
            parsed.issues,
            vec![ParseIssue::MissingParameters {
                entity: "action",
                name: "grab".into()
            }]
        );
    }

    #[test]
    fn test_parse_methods_keeps_task_verbatim() {
        let sections = vec![
            Section {
                heading: "deliver-direct".into(),
                body: "### Method Parameters\n- ?p - package\n- ?l - location\n### Method Task\n(deliver ?p ?l)\n### Method Ordered Subtasks\n(and (load ?p) (move ?l) (unload ?p))".into(),
            },
            Section {
                heading: "deliver-noop".into(),
                body: "### Method Task\ndeliver ?p ?l\n### Method Ordered Subtasks\n()".into(),
            },
        ];
        let parsed = parse_methods(&sections, "deliver").unwrap();
        assert_eq!(parsed.value.len(), 2);
        assert_eq!(parsed.value[0].task, "(deliver ?p ?l)");
        assert_eq!(parsed.value[0].params.len(), 2);
        assert_eq!(parsed.value[1].task, "deliver ?p ?l");
        assert_eq!(parsed.value[1].ordered_subtasks, "()");
        assert_eq!(parsed.issues.len(), 1);
    }

    #[test]
    fn test_empty_method_task_is_invalid() {
        let body = "### Method Task\n```\n```\n### Method Ordered Subtasks\n(a)";
        let err = parse_method(body, "m").unwrap_err();
        assert!(matches!(err, ParseError::InvalidExpression { .. }));
    }

    #[test]
    fn test_unnamed_action_heading() {
        let sections = vec![Section {
            heading: String::new(),
            body: PICK_UP.into(),
        }];
        assert!(matches!(
            parse_actions(&sections),
            Err(ParseError::UnnamedEntry { entity: "action", .. })
        ));
    }
}
