//! Logical-expression extraction from noisy model output.
//!
//! Preconditions, effects and subtask bodies arrive wrapped in commentary,
//! bullets and code fences. [`extract_logical_expression`] keeps only the
//! parenthesized formula.

use crate::parsing::error::ParseError;

/// Pull the single parenthesized formula out of `text`.
///
/// Equivalent to collecting every greedy `\((.*)\)` match (dot matching
/// newlines) and keeping the longest one. A greedy match starting at the
/// first `(` always reaches the last `)`, so that span is the answer.
/// Parenthesis balance is not verified.
///
/// ```
/// use nl2plan_domain::markdown::expression::extract_logical_expression;
///
/// let expr = extract_logical_expression("noise (a (b) c) trailing").unwrap();
/// assert_eq!(expr, "(a (b) c)");
/// ```
pub fn extract_logical_expression(text: &str) -> Result<String, ParseError> {
    let open = text.find('(').ok_or(ParseError::NoLogicalExpression)?;
    let close = text.rfind(')').ok_or(ParseError::NoLogicalExpression)?;
    if close <= open {
        return Err(ParseError::NoLogicalExpression);
    }
    Ok(format!("({})", &text[open + 1..close]))
}

/// Inner content of the balanced `(keyword ...)` form in rendered planning text.
///
/// Used to re-isolate blocks such as `(:predicates ...)` from a rendered
/// domain. Returns `None` when the keyword is absent or never closed.
pub fn find_keyword_block<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let needle = format!("({}", keyword);
    let mut search_from = 0;

    while let Some(rel) = text[search_from..].find(&needle) {
        let start = search_from + rel;
        let content_start = start + needle.len();
        search_from = content_start;

        // `(:action` must not match `(:actions`
        let boundary_ok = text[content_start..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '(' || c == ')');
        if !boundary_ok {
            continue;
        }

        let mut depth = 1usize;
        for (offset, c) in text[content_start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(text[content_start..content_start + offset].trim());
                    }
                }
                _ => {}
            }
        }
        return None;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(
            extract_logical_expression("noise (a (b) c) trailing").unwrap(),
            "(a (b) c)"
        );
    }

    #[test]
    fn test_spans_multiple_lines() {
        let text = "Here are the effects:\n```\n(and\n  (holding ?b)\n  (not (clear ?b)))\n```\nDone.";
        assert_eq!(
            extract_logical_expression(text).unwrap(),
            "(and\n  (holding ?b)\n  (not (clear ?b)))"
        );
    }

    #[test]
    fn test_disjoint_expressions_are_joined() {
        // Greedy matching spans first '(' to last ')'.
        assert_eq!(extract_logical_expression("(a) and (b)").unwrap(), "(a) and (b)");
    }

    #[test]
    fn test_no_parentheses_is_error() {
        let err = extract_logical_expression("no formula here").unwrap_err();
        assert!(matches!(err, ParseError::NoLogicalExpression));
        assert!(err.to_string().contains("entire response"));
    }

    #[test]
    fn test_close_before_open_is_error() {
        assert!(extract_logical_expression(") backwards (").is_err());
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(extract_logical_expression("()").unwrap(), "()");
    }

    #[test]
    fn test_find_keyword_block() {
        let domain = "(define (domain d)\n   (:predicates \n      (on ?a - block)\n   )\n   (:action a)\n)";
        assert_eq!(find_keyword_block(domain, ":predicates"), Some("(on ?a - block)"));
        assert_eq!(find_keyword_block(domain, ":types"), None);
    }

    #[test]
    fn test_find_keyword_block_respects_word_boundary() {
        let text = "(:actions x) (:action y)";
        assert_eq!(find_keyword_block(text, ":action"), Some("y"));
    }
}
