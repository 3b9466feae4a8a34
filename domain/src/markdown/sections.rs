//! Heading-structured section extraction.
//!
//! Model responses are laid out as markdown: `# TYPES`, `## OUTPUT`,
//! `### Action Effects` and so on. These helpers cut such a blob into the
//! pieces the entity parsers consume. They never fail: an absent section is
//! an empty string, and callers decide whether that is fatal.

/// A single `(heading, body)` pair produced by [`split_sections`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Return the heading level and title of `line`, if it is a heading.
///
/// A heading of level `n` is exactly `n` `#` characters followed by a space.
/// `#tag` and `####` with no title are not headings.
pub fn heading_of(line: &str) -> Option<(usize, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?;
    Some((hashes, rest.trim()))
}

/// Every line of `text` paired with the byte offset it starts at.
fn line_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        spans.push((offset, line.trim_end_matches(['\n', '\r'])));
        offset += line.len();
    }
    spans
}

/// Extract the body of the section titled `title` at heading `level`.
///
/// The body runs from the line after the heading to the next heading of the
/// same or a higher rank (level `<= level`), or to the end of the text. The
/// result is whitespace-trimmed. Returns `""` when the heading is absent.
///
/// ```
/// use nl2plan_domain::markdown::sections::extract_section;
///
/// let text = "# A\nalpha\n## inner\nbeta\n# B\ngamma";
/// assert_eq!(extract_section(text, "A", 1), "alpha\n## inner\nbeta");
/// assert_eq!(extract_section(text, "missing", 1), "");
/// ```
pub fn extract_section<'a>(text: &'a str, title: &str, level: usize) -> &'a str {
    let spans = line_spans(text);
    let title = title.trim();

    let Some(start_idx) = spans
        .iter()
        .position(|(_, line)| heading_of(line) == Some((level, title)))
    else {
        return "";
    };

    let body_start = spans
        .get(start_idx + 1)
        .map(|(offset, _)| *offset)
        .unwrap_or(text.len());

    let body_end = spans[start_idx + 1..]
        .iter()
        .find(|(_, line)| matches!(heading_of(line), Some((l, _)) if l <= level))
        .map(|(offset, _)| *offset)
        .unwrap_or(text.len());

    text[body_start..body_end].trim()
}

/// Split `text` into the sections headed at `level`, in document order.
///
/// Text before the first heading is ignored. Duplicate headings are kept
/// as separate entries. A section ends at the next heading of level
/// `<= level`; when that heading outranks `level` it is not itself
/// returned, so splitting stays inside the enclosing section.
pub fn split_sections(text: &str, level: usize) -> Vec<Section> {
    let spans = line_spans(text);
    let mut sections = Vec::new();
    let mut current: Option<(String, usize)> = None;

    let mut close = |current: &mut Option<(String, usize)>, end: usize| {
        if let Some((heading, start)) = current.take() {
            sections.push(Section {
                heading,
                body: text[start..end].trim().to_string(),
            });
        }
    };

    for (idx, (offset, line)) in spans.iter().enumerate() {
        match heading_of(line) {
            Some((l, title)) if l == level => {
                close(&mut current, *offset);
                let body_start = spans
                    .get(idx + 1)
                    .map(|(o, _)| *o)
                    .unwrap_or(text.len());
                current = Some((title.to_string(), body_start));
            }
            Some((l, _)) if l < level => close(&mut current, *offset),
            _ => {}
        }
    }
    close(&mut current, text.len());

    sections
}

/// Content following a `[NAME]` tag, up to the next line opening with a
/// `[TAG]`.
///
/// Tag matching is case-insensitive. Prompt templates use this layout
/// (`[ROLE]`, `[TEMPLATE]`, ...). Returns `""` when the tag is absent.
pub fn extract_bracket_block(text: &str, name: &str) -> String {
    let tag = format!("[{}]", name);
    let spans = line_spans(text);

    let Some((idx, first)) = spans.iter().enumerate().find_map(|(idx, (_, line))| {
        let trimmed = line.trim_start();
        let head = trimmed.get(..tag.len())?;
        head.eq_ignore_ascii_case(&tag)
            .then(|| (idx, &trimmed[tag.len()..]))
    }) else {
        return String::new();
    };

    let mut block = vec![first];
    block.extend(
        spans[idx + 1..]
            .iter()
            .map(|(_, line)| *line)
            .take_while(|line| !opens_with_bracket_tag(line.trim_start())),
    );
    block.join("\n").trim().to_string()
}

fn opens_with_bracket_tag(line: &str) -> bool {
    let Some((tag, _)) = line.strip_prefix('[').and_then(|rest| rest.split_once(']')) else {
        return false;
    };
    !tag.is_empty() && tag.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// The marker text of `line`: heading hashes, bold stars and a trailing
/// colon stripped.
fn marker_text(line: &str) -> &str {
    line.trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim_end_matches(':')
        .trim()
}

/// Content of a block introduced by a fixed marker line.
///
/// A marker line may be a heading (`### Action Effects`), bold text
/// (`**Action Effects**`) or bare text. The block runs to the next heading
/// or to the next line carrying any of `markers`, in any of those forms.
/// Code fences are removed and surrounding backticks trimmed.
/// Returns `None` when no line carries `marker`.
pub fn labeled_block(text: &str, marker: &str, markers: &[&str]) -> Option<String> {
    let spans = line_spans(text);
    let idx = spans.iter().position(|(_, line)| marker_text(line) == marker)?;

    let body: Vec<&str> = spans[idx + 1..]
        .iter()
        .map(|(_, line)| *line)
        .take_while(|line| heading_of(line).is_none() && !markers.contains(&marker_text(line)))
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect();

    Some(body.join("\n").trim_matches([' ', '`', '\n']).to_string())
}
