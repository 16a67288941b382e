//! Span/line normalization and paragraph merging.

use crate::analyze::median;
use crate::layout::RawLine;

/// A normalized line: merged span text, representative size, bold flag.
///
/// Ephemeral — produced per text block and consumed by the classifier and
/// assembler within the same block.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub size: f32,
    pub bold: bool,
}

/// Normalize a block's raw lines.
///
/// Concatenates non-empty span texts in order, takes the median span size
/// as the line size (0.0 when absent), and marks the line bold if any
/// contributing span is bold. Lines with empty merged text are discarded.
pub fn lines_from_block(raw_lines: &[RawLine]) -> Vec<Line> {
    let mut lines = Vec::new();
    for raw in raw_lines {
        let mut text = String::new();
        let mut sizes = Vec::new();
        let mut bold = false;
        for span in &raw.spans {
            if span.text.is_empty() {
                continue;
            }
            text.push_str(&span.text);
            sizes.push(span.size);
            if span.is_bold() {
                bold = true;
            }
        }
        let text = text.trim().to_string();
        if text.is_empty() {
            continue;
        }
        lines.push(Line {
            text,
            size: median(&mut sizes, 0.0),
            bold,
        });
    }
    lines
}

/// Merge a multi-line block into one paragraph string.
///
/// When the running text ends in a hyphen and the next line starts with a
/// lowercase letter, the hyphen is dropped and the line concatenated
/// directly (hyphenation repair); otherwise lines join with a single space.
pub fn merge_lines(lines: &[Line]) -> String {
    let mut merged = String::new();
    for line in lines {
        let text = line.text.as_str();
        if text.is_empty() {
            continue;
        }
        if merged.is_empty() {
            merged.push_str(text);
            continue;
        }
        if merged.ends_with('-') && starts_lowercase(text) {
            merged.pop();
            merged.push_str(text);
        } else {
            merged.push(' ');
            merged.push_str(text);
        }
    }
    merged.trim().to_string()
}

pub(crate) fn starts_lowercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Span, FLAG_BOLD};

    fn line(text: &str, size: f32) -> Line {
        Line {
            text: text.to_string(),
            size,
            bold: false,
        }
    }

    #[test]
    fn test_lines_from_block_merges_spans() {
        let raw = vec![RawLine::new(vec![
            Span::new("Hello ", "F", 10.0),
            Span::new("world", "F", 12.0),
        ])];
        let lines = lines_from_block(&raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
        assert_eq!(lines[0].size, 11.0);
        assert!(!lines[0].bold);
    }

    #[test]
    fn test_lines_from_block_discards_empty() {
        let raw = vec![
            RawLine::new(vec![Span::new("   ", "F", 10.0)]),
            RawLine::new(vec![]),
            RawLine::new(vec![Span::new("kept", "F", 10.0)]),
        ];
        let lines = lines_from_block(&raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "kept");
    }

    #[test]
    fn test_lines_from_block_bold_any_span() {
        let mut bold_span = Span::new("b", "F", 10.0);
        bold_span.flags = FLAG_BOLD;
        let raw = vec![RawLine::new(vec![Span::new("a", "F", 10.0), bold_span])];
        assert!(lines_from_block(&raw)[0].bold);
    }

    #[test]
    fn test_merge_hyphenation_repair() {
        let lines = [line("intro-", 10.0), line("duction", 10.0)];
        assert_eq!(merge_lines(&lines), "introduction");
    }

    #[test]
    fn test_merge_space_join_without_hyphen() {
        let lines = [line("Introduction", 10.0), line("to testing", 10.0)];
        assert_eq!(merge_lines(&lines), "Introduction to testing");
    }

    #[test]
    fn test_merge_hyphen_before_uppercase_keeps_hyphen() {
        let lines = [line("well-", 10.0), line("Known", 10.0)];
        assert_eq!(merge_lines(&lines), "well- Known");
    }

    #[test]
    fn test_merge_empty_input() {
        assert_eq!(merge_lines(&[]), "");
    }
}
