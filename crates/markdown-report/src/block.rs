use crate::patterns;

const FENCE: &str = "```";

/// Block construct that a line opens, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Fence,
    Heading,
    Rule,
    Table,
    Blockquote,
    UnorderedItem,
    OrderedItem,
    Blank,
    Paragraph,
}

/// Ordered predicates; the first one that accepts a line decides its kind.
const CLASSIFIERS: &[(LineKind, fn(&str) -> bool)] = &[
    (LineKind::Fence, is_fence),
    (LineKind::Heading, is_heading),
    (LineKind::Rule, is_rule),
    (LineKind::Table, is_table_row),
    (LineKind::Blockquote, is_blockquote),
    (LineKind::UnorderedItem, is_unordered_item),
    (LineKind::OrderedItem, is_ordered_item),
    (LineKind::Blank, is_blank),
];

/// Classifies a single line. Lines no other construct claims are paragraph text.
pub fn classify(line: &str) -> LineKind {
    CLASSIFIERS
        .iter()
        .find(|(_, accepts)| accepts(line))
        .map(|(kind, _)| *kind)
        .unwrap_or(LineKind::Paragraph)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
    pub level: usize,
    pub text: &'a str,
}

pub(crate) fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let caps = patterns::heading().captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str();
    Some(Heading { level, text })
}

pub(crate) fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

fn is_heading(line: &str) -> bool {
    patterns::heading().is_match(line)
}

fn is_rule(line: &str) -> bool {
    patterns::rule().is_match(line.trim())
}

pub(crate) fn is_table_row(line: &str) -> bool {
    line.trim().starts_with('|')
}

pub(crate) fn is_blockquote(line: &str) -> bool {
    line.starts_with('>')
}

pub(crate) fn is_unordered_item(line: &str) -> bool {
    patterns::unordered_item().is_match(line.trim())
}

pub(crate) fn is_ordered_item(line: &str) -> bool {
    patterns::ordered_item().is_match(line.trim())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Language token of an opening fence, restricted to `[A-Za-z0-9_-]`.
pub(crate) fn fence_language(line: &str) -> String {
    line.strip_prefix(FENCE)
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect()
}

/// Drops the `>` marker and at most one whitespace character after it.
pub(crate) fn strip_quote_marker(line: &str) -> &str {
    let rest = line.strip_prefix('>').unwrap_or(line);
    match rest.chars().next() {
        Some(ch) if ch.is_whitespace() => &rest[ch.len_utf8()..],
        _ => rest,
    }
}

pub(crate) fn unordered_item_text(line: &str) -> &str {
    strip_marker(line.trim(), patterns::unordered_item())
}

pub(crate) fn ordered_item_text(line: &str) -> &str {
    strip_marker(line.trim(), patterns::ordered_item())
}

fn strip_marker<'a>(line: &'a str, marker: &regex::Regex) -> &'a str {
    match marker.find(line) {
        Some(found) => &line[found.end()..],
        None => line,
    }
}

/// Splits a table row into trimmed cell texts.
///
/// By default every cell that is empty after trimming is dropped, which also
/// removes the empty strings produced by the bounding pipes. With
/// `keep_empty` only the bounding pipes are removed, so blank interior cells
/// keep their column.
pub(crate) fn table_cells(line: &str, keep_empty: bool) -> Vec<&str> {
    if !keep_empty {
        return line
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect();
    }

    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split('|').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_construct() {
        assert_eq!(classify("```rust"), LineKind::Fence);
        assert_eq!(classify("## Findings"), LineKind::Heading);
        assert_eq!(classify("  ----  "), LineKind::Rule);
        assert_eq!(classify("| a | b |"), LineKind::Table);
        assert_eq!(classify("> quoted"), LineKind::Blockquote);
        assert_eq!(classify("  - item"), LineKind::UnorderedItem);
        assert_eq!(classify("* item"), LineKind::UnorderedItem);
        assert_eq!(classify("12. item"), LineKind::OrderedItem);
        assert_eq!(classify("   \t"), LineKind::Blank);
        assert_eq!(classify("plain text"), LineKind::Paragraph);
    }

    #[test]
    fn fence_wins_over_everything() {
        assert_eq!(classify("```| not a table"), LineKind::Fence);
    }

    #[test]
    fn rule_wins_over_list_marker() {
        assert_eq!(classify("---"), LineKind::Rule);
        assert_eq!(classify("- - -"), LineKind::UnorderedItem);
    }

    #[test]
    fn heading_requires_space_and_at_most_four_hashes() {
        assert_eq!(classify("#hashtag"), LineKind::Paragraph);
        assert_eq!(classify("##### too deep"), LineKind::Paragraph);
        assert_eq!(classify("# "), LineKind::Paragraph);
        assert_eq!(classify(" # indented"), LineKind::Paragraph);
        assert_eq!(classify("#### four"), LineKind::Heading);
    }

    #[test]
    fn markers_need_trailing_whitespace() {
        assert_eq!(classify("-item"), LineKind::Paragraph);
        assert_eq!(classify("1.item"), LineKind::Paragraph);
        assert_eq!(classify("**bold** start"), LineKind::Paragraph);
        assert_eq!(classify("-"), LineKind::Paragraph);
    }

    #[test]
    fn indented_quote_is_not_a_blockquote() {
        assert_eq!(classify("  > quoted"), LineKind::Paragraph);
    }

    #[test]
    fn parses_heading_level_and_text() {
        let heading = parse_heading("### Risks and `gaps`").unwrap();
        assert_eq!(heading.level, 3);
        assert_eq!(heading.text, "Risks and `gaps`");
    }

    #[test]
    fn sanitizes_fence_language() {
        assert_eq!(fence_language("```js"), "js");
        assert_eq!(fence_language("```  c++ "), "c");
        assert_eq!(fence_language("```\"><script>"), "script");
        assert_eq!(fence_language("```objective-c_2"), "objective-c_2");
        assert_eq!(fence_language("```"), "");
    }

    #[test]
    fn strips_one_quote_marker_and_one_space() {
        assert_eq!(strip_quote_marker("> text"), "text");
        assert_eq!(strip_quote_marker(">text"), "text");
        assert_eq!(strip_quote_marker(">  text"), " text");
        assert_eq!(strip_quote_marker(">> nested"), "> nested");
    }

    #[test]
    fn strips_list_markers() {
        assert_eq!(unordered_item_text("  -   spaced"), "spaced");
        assert_eq!(unordered_item_text("* star"), "star");
        assert_eq!(ordered_item_text("10.  tenth"), "tenth");
    }

    #[test]
    fn table_cells_drop_empty_entries_by_default() {
        assert_eq!(table_cells("| A | B |", false), vec!["A", "B"]);
        assert_eq!(table_cells("| A |  | C |", false), vec!["A", "C"]);
        assert_eq!(table_cells("|---|---|", false), vec!["---", "---"]);
    }

    #[test]
    fn table_cells_can_keep_interior_blanks() {
        assert_eq!(table_cells("| A |  | C |", true), vec!["A", "", "C"]);
        assert_eq!(table_cells("| A | B", true), vec!["A", "B"]);
        assert!(table_cells("|", true).is_empty());
    }
}
