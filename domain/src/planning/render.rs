//! Domain and problem rendering.
//!
//! Output follows a fixed layout with three-space indentation steps:
//!
//! ```text
//! (define (domain blocks)
//!    (:requirements
//!       :strips :typing)
//!
//!    (:types
//!       block
//!    )
//!
//!    (:predicates
//!       (on ?a - block ?b - block) ; a is on b
//!    )
//!
//!    (:action pick-up
//!       ...
//!    )
//! )
//! ```

use super::dialect::Dialect;
use super::entities::{Action, Literal, Method, ParameterList, Task};
use super::model::{ExtractedModel, ModelHeader};
use thiserror::Error;

/// Errors raised when a render is requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("No model has been extracted yet; run an extraction before rendering")]
    NotExtracted,
}

const INDENT: &str = "   ";

/// Prefix every line of `text` with `level` indentation steps.
pub fn indent(text: &str, level: usize) -> String {
    let pad = INDENT.repeat(level);
    format!("{}{}", pad, text.replace('\n', &format!("\n{}", pad)))
}

/// Lower-case the connectives `AND` and `OR` where they stand as whole words.
pub fn lowercase_connectives(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        match word.as_str() {
            "AND" => out.push_str("and"),
            "OR" => out.push_str("or"),
            _ => out.push_str(word),
        }
        word.clear();
    };

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

fn parameter_lines(params: &ParameterList) -> String {
    params
        .iter()
        .map(|(name, ty)| format!("{} - {}", name, ty))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parameters_block(params: &ParameterList) -> String {
    format!(
        "{}:parameters (\n{}\n{})\n",
        INDENT,
        indent(&parameter_lines(params), 2),
        INDENT
    )
}

fn action_block(action: &Action) -> String {
    let mut desc = format!("(:action {}\n", action.name);
    desc += &parameters_block(&action.params);
    desc += &format!("{}:precondition\n{}\n", INDENT, indent(&action.preconditions, 2));
    desc += &format!("{}:effect\n{}\n", INDENT, indent(&action.effects, 2));
    desc.push(')');
    desc
}

/// `(deliver ?p ?l)`, wrapping a bare `deliver ?p ?l` in parentheses.
fn method_task(task: &str) -> String {
    if task.starts_with('(') {
        task.to_string()
    } else {
        format!("({})", task)
    }
}

fn hddl_task_block(task: &Task) -> String {
    format!("(:task {}\n{})", task.name, parameters_block(&task.params))
}

fn hddl_method_block(method: &Method) -> String {
    let mut desc = format!("(:method {}\n", method.name);
    desc += &parameters_block(&method.params);
    desc += &format!("{}:task\n{}\n", INDENT, indent(&method_task(&method.task), 2));
    desc += &format!(
        "{}:ordered-tasks\n{}\n",
        INDENT,
        indent(&method.ordered_subtasks, 2)
    );
    desc.push(')');
    desc
}

fn hpdl_method_block(method: &Method) -> String {
    format!(
        "(:method {}\n{}:tasks\n{}\n)",
        method.name,
        INDENT,
        indent(&method.ordered_subtasks, 2)
    )
}

fn hpdl_task_block(task: &Task) -> String {
    let methods: String = task
        .methods
        .iter()
        .map(|m| format!("\n\n{}", indent(&hpdl_method_block(m), 1)))
        .collect();
    format!(
        "(:task {}\n{}{}{}\n)",
        task.name,
        parameters_block(&task.params),
        INDENT,
        methods
    )
}

fn sibling_blocks(blocks: impl IntoIterator<Item = String>) -> String {
    blocks
        .into_iter()
        .map(|block| format!("\n\n{}", indent(&block, 1)))
        .collect()
}

/// Render the domain definition in `dialect`.
pub fn render_domain(header: &ModelHeader, model: &ExtractedModel, dialect: Dialect) -> String {
    let types = model.types.pruned().declarations().join("\n");
    let predicates = model
        .predicates
        .iter()
        .map(|p| p.declaration())
        .collect::<Vec<_>>()
        .join("\n");

    let mut desc = format!("(define (domain {})\n", header.domain_name);
    desc += &indent(
        &format!("(:requirements\n{}{})", INDENT, header.requirements.join(" ")),
        1,
    );
    desc += "\n\n";
    if !types.is_empty() {
        desc += &format!("{}(:types \n{}\n{})\n\n", INDENT, indent(&types, 2), INDENT);
    }
    desc += &format!(
        "{}(:predicates \n{}\n{})",
        INDENT,
        indent(&predicates, 2),
        INDENT
    );

    match dialect {
        Dialect::Pddl => {}
        Dialect::Hddl => {
            desc += &sibling_blocks(model.tasks.iter().map(hddl_task_block));
            desc += &sibling_blocks(
                model
                    .tasks
                    .iter()
                    .flat_map(|t| t.methods.iter())
                    .map(hddl_method_block),
            );
        }
        Dialect::Hpdl => desc += &sibling_blocks(model.tasks.iter().map(hpdl_task_block)),
    }

    desc += &sibling_blocks(model.actions.iter().map(action_block));
    desc += "\n)";
    lowercase_connectives(&desc)
}

fn literal_lines(literals: &[Literal]) -> String {
    literals
        .iter()
        .map(Literal::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn goal_conjunction(goal: &[Literal]) -> String {
    format!("(and\n{}\n)", indent(&literal_lines(goal), 1))
}

/// Render the problem definition in `dialect`.
pub fn render_problem(header: &ModelHeader, model: &ExtractedModel, dialect: Dialect) -> String {
    let objects = model
        .objects
        .iter()
        .map(|(name, ty)| format!("{} - {}", name, ty))
        .collect::<Vec<_>>()
        .join("\n");
    let init = format!(
        "{}(:init\n{}\n{})\n\n",
        INDENT,
        indent(&literal_lines(&model.initial), 2),
        INDENT
    );
    let goal = goal_conjunction(&model.goal);

    let mut desc = String::from("(define\n");
    desc += &format!("{}(problem {})\n", INDENT, header.problem_name);
    desc += &format!("{}(:domain {})\n\n", INDENT, header.domain_name);
    desc += &format!("{}(:objects \n{}\n{})\n\n", INDENT, indent(&objects, 2), INDENT);

    match dialect {
        Dialect::Pddl => {
            desc += &init;
            desc += &format!("{}(:goal\n{}\n{})\n\n", INDENT, indent(&goal, 2), INDENT);
        }
        Dialect::Hpdl => {
            desc += &format!(
                "{}(:tasks-goal\n{}\n{}\n{})\n\n",
                INDENT,
                indent(":tasks", 2),
                indent(&goal, 3),
                INDENT
            );
            desc += &init;
        }
        Dialect::Hddl => {
            desc += &format!(
                "{}(:htn\n{}\n{}\n{}\n{})\n\n",
                INDENT,
                indent(":parameters ()", 2),
                indent(":ordered-subtasks", 2),
                indent(&goal, 3),
                INDENT
            );
            desc += &init;
        }
    }

    desc.push(')');
    lowercase_connectives(&desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::expression::find_keyword_block;
    use crate::parsing::declarations::parse_predicates;
    use crate::planning::entities::{Predicate, TypeDecl};

    fn params(pairs: &[(&str, &str)]) -> ParameterList {
        pairs
            .iter()
            .map(|(n, t)| (n.to_string(), t.to_string()))
            .collect()
    }

    fn blocks_model() -> (ModelHeader, ExtractedModel) {
        let header = ModelHeader::new("blocks", "stack-two")
            .with_requirements(vec![":strips".into(), ":typing".into()]);
        let mut model = ExtractedModel::default();
        model.predicates = vec![
            Predicate::new(
                "on",
                params(&[("?a", "block"), ("?b", "block")]),
                "a is on b",
                "",
            ),
            Predicate::new("clear", params(&[("?x", "block")]), "", ""),
        ];
        model.actions = vec![
            Action {
                name: "stack".into(),
                params: params(&[("?a", "block"), ("?b", "block")]),
                preconditions: "(AND (clear ?a) (clear ?b))".into(),
                effects: "(AND (on ?a ?b) (not (clear ?b)))".into(),
                raw: String::new(),
            },
            Action {
                name: "unstack".into(),
                params: params(&[("?a", "block"), ("?b", "block")]),
                preconditions: "(OR (on ?a ?b))".into(),
                effects: "(AND (clear ?b) (not (on ?a ?b)))".into(),
                raw: String::new(),
            },
        ];
        model.objects = params(&[("a", "block"), ("b", "block")]);
        model.initial = vec![
            Literal::new("clear", vec!["a".into()]),
            Literal::new("clear", vec!["b".into()]),
        ];
        model.goal = vec![Literal::new("on", vec!["a".into(), "b".into()])];
        (header, model)
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb", 1), "   a\n   b");
        assert_eq!(indent("a", 0), "a");
    }

    #[test]
    fn test_lowercase_connectives_whole_words() {
        assert_eq!(
            lowercase_connectives("(AND (ORDER x) (OR a) (BRAND y))"),
            "(and (ORDER x) (or a) (BRAND y))"
        );
    }

    #[test]
    fn test_pddl_domain_shape() {
        let (header, model) = blocks_model();
        let domain = render_domain(&header, &model, Dialect::Pddl);

        assert!(domain.starts_with(
            "(define (domain blocks)\n   (:requirements\n      :strips :typing)\n\n"
        ));
        assert_eq!(domain.matches("(:predicates").count(), 1);
        assert_eq!(domain.matches("(:types").count(), 0);
        assert_eq!(domain.matches("(:action ").count(), 2);
        assert!(!domain.contains("AND") && !domain.contains("OR"));
        assert!(domain.contains("(and (clear ?a) (clear ?b))"));
        assert!(domain.contains("(or (on ?a ?b))"));
        assert!(domain.contains("      (on ?a - block ?b - block) ; a is on b\n"));
        assert!(domain.ends_with("\n)"));
    }

    #[test]
    fn test_types_block_skips_reserved_names() {
        let (header, mut model) = blocks_model();
        model.types.insert("object", TypeDecl::default());
        let domain = render_domain(&header, &model, Dialect::Pddl);
        assert!(!domain.contains("(:types"));

        model.types.insert(
            "block",
            TypeDecl {
                parent: Some("object".into()),
                description: String::new(),
            },
        );
        let domain = render_domain(&header, &model, Dialect::Pddl);
        assert!(domain.contains("   (:types \n      block - object\n   )\n\n"));
    }

    #[test]
    fn test_rendered_predicates_parse_back() {
        let (header, model) = blocks_model();
        let domain = render_domain(&header, &model, Dialect::Pddl);

        let block = find_keyword_block(&domain, ":predicates").unwrap();
        let parsed = parse_predicates(block);
        assert!(parsed.issues.is_empty());
        let reparsed: Vec<&ParameterList> = parsed.value.iter().map(|p| &p.params).collect();
        let original: Vec<&ParameterList> = model.predicates.iter().map(|p| &p.params).collect();
        assert_eq!(reparsed, original);
        assert_eq!(parsed.value[0].description, "a is on b");
    }

    fn deliver_task() -> Task {
        Task::new("deliver", params(&[("?p", "package")]), "", "").with_methods(vec![
            Method {
                name: "m-direct".into(),
                params: params(&[("?p", "package")]),
                task: "deliver ?p".into(),
                ordered_subtasks: "(and (load ?p) (unload ?p))".into(),
                raw: String::new(),
            },
        ])
    }

    #[test]
    fn test_hddl_methods_are_siblings() {
        let (header, mut model) = blocks_model();
        model.tasks = vec![deliver_task()];
        let domain = render_domain(&header, &model, Dialect::Hddl);

        let task_at = domain.find("(:task deliver").unwrap();
        let task_close = task_at + domain[task_at..].find("\n   )").unwrap();
        let method_at = domain.find("(:method m-direct").unwrap();
        assert!(method_at > task_close);
        assert!(domain.contains(":task\n         (deliver ?p)"));
        assert!(domain.contains(":ordered-tasks"));
    }

    #[test]
    fn test_hpdl_methods_are_nested() {
        let (header, mut model) = blocks_model();
        model.tasks = vec![deliver_task()];
        let domain = render_domain(&header, &model, Dialect::Hpdl);

        let task = find_keyword_block(&domain, ":task").unwrap();
        assert!(task.contains("(:method m-direct"));
        assert!(task.contains(":tasks"));
        assert!(!domain.contains(":ordered-tasks"));
    }

    #[test]
    fn test_pddl_ignores_tasks() {
        let (header, mut model) = blocks_model();
        model.tasks = vec![deliver_task()];
        let domain = render_domain(&header, &model, Dialect::Pddl);
        assert!(!domain.contains(":task"));
        assert!(!domain.contains(":method"));
    }

    #[test]
    fn test_pddl_problem() {
        let (header, model) = blocks_model();
        let problem = render_problem(&header, &model, Dialect::Pddl);
        assert!(problem.starts_with("(define\n   (problem stack-two)\n   (:domain blocks)\n\n"));
        assert!(problem.contains("   (:objects \n      a - block\n      b - block\n   )"));
        assert!(problem.contains("   (:init\n      (clear a)\n      (clear b)\n   )"));
        assert!(problem.contains("(:goal\n      (and\n         (on a b)\n      )\n   )"));
        assert!(problem.find("(:init").unwrap() < problem.find("(:goal").unwrap());
        assert!(problem.ends_with(")"));
    }

    #[test]
    fn test_htn_problems_put_network_before_init() {
        let (header, model) = blocks_model();

        let hddl = render_problem(&header, &model, Dialect::Hddl);
        assert!(hddl.contains("(:htn\n      :parameters ()\n      :ordered-subtasks\n"));
        assert!(hddl.find("(:htn").unwrap() < hddl.find("(:init").unwrap());
        assert!(!hddl.contains("(:goal"));

        let hpdl = render_problem(&header, &model, Dialect::Hpdl);
        assert!(hpdl.contains("(:tasks-goal\n      :tasks\n"));
        assert!(hpdl.find("(:tasks-goal").unwrap() < hpdl.find("(:init").unwrap());
    }
}
