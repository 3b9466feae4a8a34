//! Simplified list parsers: type hierarchy, objects, initial and goal state.

use super::declarations::{strip_list_marker, ListMode};
use super::error::{ParseIssue, Parsed};
use crate::planning::entities::{Literal, ObjectList, TypeDecl, TypeHierarchy};

/// The list entries of `text` as `(line, entry)` pairs; non-entries are reported.
fn entries<'t>(
    text: &'t str,
    mode: ListMode,
    issues: &mut Vec<ParseIssue>,
) -> Vec<(&'t str, &'t str)> {
    let mut found = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with("```") {
            continue;
        }
        match strip_list_marker(line, mode) {
            Some(entry) if !entry.is_empty() => found.push((line, entry)),
            _ => issues.push(ParseIssue::UnparseableLine {
                line: line.to_string(),
            }),
        }
    }
    found
}

/// Split at the first `": "`, dropping the description.
fn without_description(entry: &str) -> (&str, &str) {
    match entry.split_once(": ") {
        Some((head, desc)) => (head.trim(), desc.trim()),
        None => (entry.trim().trim_end_matches(':'), ""),
    }
}

/// Parse `- name: desc` / `- name - parent: desc` lines.
pub fn parse_types(text: &str) -> Parsed<TypeHierarchy> {
    let mut issues = Vec::new();
    let mut types = TypeHierarchy::new();

    for (_, entry) in entries(text, ListMode::Markdown, &mut issues) {
        let (head, description) = without_description(entry);
        let head = head.trim_matches('`');
        let (name, parent) = match head.split_once(" - ") {
            Some((name, parent)) => (name.trim(), Some(parent.trim().to_string())),
            None => (head, None),
        };
        if name.is_empty() {
            continue;
        }
        types.insert(
            name,
            TypeDecl {
                parent: parent.filter(|p| !p.is_empty()),
                description: description.to_string(),
            },
        );
    }

    Parsed::new(types, issues)
}

/// Parse `- name - type: desc` object lines.
///
/// Lines without a type are reported as [`ParseIssue::UntypedObject`] and
/// skipped. Several names may share one type (`- a b - block`).
pub fn parse_objects(text: &str, mode: ListMode) -> Parsed<ObjectList> {
    let mut issues = Vec::new();
    let mut objects = ObjectList::new();
    let mut untyped = Vec::new();

    for (line, entry) in entries(text, mode, &mut issues) {
        let (head, _) = without_description(entry);
        let head = head.trim_matches(['`', '(', ')']);
        match head.rsplit_once(" - ") {
            Some((names, ty)) if !ty.trim().is_empty() => {
                for name in names.split_whitespace() {
                    objects.insert(name.to_string(), ty.trim().to_string());
                }
            }
            _ => untyped.push(line.to_string()),
        }
    }

    issues.extend(
        untyped
            .into_iter()
            .map(|line| ParseIssue::UntypedObject { line }),
    );
    Parsed::new(objects, issues)
}

/// Parse one `(pred a b)` / `(not (pred a b))` atom.
///
/// Compound forms such as `(and ...)` or `(or ...)` are not literals and
/// yield `None`.
pub fn parse_literal(text: &str) -> Option<Literal> {
    let mut body = text.trim().trim_matches('`').trim();
    let mut negated = false;

    // Peel one level of parentheses at a time.
    loop {
        let inner = match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            Some(inner) => inner.trim(),
            None => break,
        };
        if let Some(rest) = inner.strip_prefix("not ").or_else(|| inner.strip_prefix("not(")) {
            negated = !negated;
            body = if inner.starts_with("not(") {
                &inner[3..]
            } else {
                rest.trim()
            };
            continue;
        }
        body = inner;
    }
    if body.contains(['(', ')']) {
        return None;
    }

    let mut tokens = body
        .split_whitespace()
        .map(|t| t.trim_matches(['(', ')']))
        .filter(|t| !t.is_empty());
    let predicate = tokens.next()?.to_string();
    let literal = Literal::new(predicate, tokens.map(str::to_string).collect());
    Some(if negated { literal.negated() } else { literal })
}

/// The balanced `( ... )` form an entry opens with, if any.
///
/// The description separator only counts after the atom closes, so
/// `(on a b): a (red) block` yields `(on a b)`.
fn leading_atom(entry: &str) -> Option<&str> {
    let entry = entry.trim_start_matches('`');
    if !entry.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (idx, c) in entry.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&entry[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// The member atoms of an `(and ...)` form, or `None` for anything else.
fn conjunction_members(atom: &str) -> Option<Vec<&str>> {
    let inner = atom.trim().strip_prefix('(')?.strip_suffix(')')?.trim_start();
    if !inner.get(..3)?.eq_ignore_ascii_case("and") {
        return None;
    }
    let mut rest = &inner[3..];
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
        return None;
    }

    let mut members = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Some(members);
        }
        if !rest.starts_with('(') {
            return None;
        }
        let member = leading_atom(rest)?;
        members.push(member);
        rest = &rest[member.len()..];
    }
}

fn parse_literals(text: &str, mode: ListMode) -> Parsed<Vec<Literal>> {
    let mut issues = Vec::new();
    let mut literals = Vec::new();
    let mut empty = Vec::new();
    let mut compound = Vec::new();

    for (line, entry) in entries(text, mode, &mut issues) {
        let atom = leading_atom(entry).unwrap_or_else(|| without_description(entry).0);
        let atoms = conjunction_members(atom).unwrap_or_else(|| vec![atom]);
        for atom in atoms {
            match parse_literal(atom) {
                Some(literal) => literals.push(literal),
                None if atom.matches('(').count() > 1 => compound.push(line.to_string()),
                None => empty.push(line.to_string()),
            }
        }
    }

    issues.extend(empty.into_iter().map(|line| ParseIssue::EmptyLiteral { line }));
    issues.extend(compound.into_iter().map(|line| ParseIssue::CompoundLiteral { line }));
    Parsed::new(literals, issues)
}

/// Parse the initial-state literal list.
pub fn parse_initial(text: &str, mode: ListMode) -> Parsed<Vec<Literal>> {
    parse_literals(text, mode)
}

/// Parse the goal literal list (task network entries in HTN dialects).
pub fn parse_goal(text: &str, mode: ListMode) -> Parsed<Vec<Literal>> {
    parse_literals(text, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_types_with_parents() {
        let text = "- object: root\n- vehicle - object: moves\n- truck - vehicle\nnoise";
        let parsed = parse_types(text);
        assert_eq!(parsed.value.len(), 3);
        assert_eq!(
            parsed.value.get("truck").unwrap().parent.as_deref(),
            Some("vehicle")
        );
        assert_eq!(parsed.value.get("vehicle").unwrap().description, "moves");
        assert_eq!(parsed.issues.len(), 1);
    }

    #[test]
    fn test_parse_objects() {
        let text = "- a - block: the first block\n- b c - block\n- d\n";
        let parsed = parse_objects(text, ListMode::Markdown);
        assert_eq!(
            parsed.value.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            parsed.issues,
            vec![ParseIssue::UntypedObject { line: "- d".into() }]
        );
    }

    #[test]
    fn test_parse_literal_forms() {
        assert_eq!(
            parse_literal("(on a b)"),
            Some(Literal::new("on", vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            parse_literal("(not (clear a))"),
            Some(Literal::new("clear", vec!["a".into()]).negated())
        );
        assert_eq!(parse_literal("(handempty)"), Some(Literal::new("handempty", vec![])));
        assert_eq!(
            parse_literal("`ontable c`"),
            Some(Literal::new("ontable", vec!["c".into()]))
        );
        assert_eq!(parse_literal("()"), None);
        assert_eq!(parse_literal("(and (on a b) (on b c))"), None);
    }

    #[test]
    fn test_parse_initial_ignores_descriptions() {
        let text = "- (on a b): a (the red one) is on b\n- (not (holding a)): hand free\n1. (clear a)";
        let parsed = parse_initial(text, ListMode::Markdown);
        assert!(parsed.issues.is_empty());
        let rendered: Vec<String> = parsed.value.iter().map(Literal::to_string).collect();
        assert_eq!(rendered, vec!["(on a b)", "(not (holding a))", "(clear a)"]);
    }

    #[test]
    fn test_parse_goal_reports_empty_entries() {
        let parsed = parse_goal("- ()\n- (on b a)", ListMode::Markdown);
        assert_eq!(parsed.value.len(), 1);
        assert!(matches!(parsed.issues[0], ParseIssue::EmptyLiteral { .. }));
    }

    #[test]
    fn test_parse_goal_splits_conjunction() {
        let parsed = parse_goal("- (AND (on a b) (not (on b c))): stack them", ListMode::Markdown);
        assert!(parsed.issues.is_empty());
        let rendered: Vec<String> = parsed.value.iter().map(Literal::to_string).collect();
        assert_eq!(rendered, vec!["(on a b)", "(not (on b c))"]);
    }

    #[test]
    fn test_parse_goal_rejects_disjunction() {
        let parsed = parse_goal("- (or (on a b) (on b c))\n- (clear a)", ListMode::Markdown);
        assert_eq!(parsed.value, vec![Literal::new("clear", vec!["a".into()])]);
        assert_eq!(
            parsed.issues,
            vec![ParseIssue::CompoundLiteral {
                line: "- (or (on a b) (on b c))".into()
            }]
        );
    }
}
