//! Heuristic classification of merged text units.
//!
//! Labels a text unit as a heading (with depth), list item, contents entry,
//! or plain paragraph, using numbering patterns and font-size ratios
//! against the document body-size baseline.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyze::line::Line;

/// Section numbering: `1.`, `2.3)`, `4.1.2.` followed by a title.
static NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)(?:\.|\))\s+(.+)$").unwrap());

/// Bullet glyph (or dash) prefix of a list item.
static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\u{2022}\u{2023}\u{25E6}\u{2043}\u{2219}\-\u{2013}\u{2014}]\s+").unwrap()
});

/// Figure caption label: "Fig. 3", "Figure 12", "Obr. 4".
static FIGURE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Obr\.|Fig\.|Figure)\s*\d+").unwrap());

/// Leader-dot run connecting a contents entry to its page number.
static LEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\s+(?:\.{3,}|(?:·\s*){3,}|(?:•\s*){3,}|(?:⋅\s*){3,}))\s*\d+\s*$").unwrap()
});

/// Depth of a numbering prefix: `4.1.2.` has depth 3.
pub fn numbering_depth(text: &str) -> Option<usize> {
    NUMBERING
        .captures(text)
        .map(|caps| caps[1].split('.').count())
}

/// Heading detection for a single line.
///
/// A numbering prefix wins at depth + 1 (capped at 6). Otherwise the line
/// size is compared against the body baseline; the 1.8x tier yields level 1
/// only for the document's first detected heading.
pub fn detect_heading(line: &Line, body_size: f32, headings_seen: usize) -> Option<u8> {
    if let Some(depth) = numbering_depth(&line.text) {
        return Some(depth.saturating_add(1).min(6) as u8);
    }
    if line.size >= body_size * 1.8 {
        return Some(if headings_seen == 0 { 1 } else { 2 });
    }
    if line.size >= body_size * 1.4 {
        return Some(2);
    }
    if line.size >= body_size * 1.2 && line.text.chars().count() <= 120 {
        return Some(3);
    }
    None
}

/// A block is a list only when every line carries a bullet prefix.
pub fn is_list_block(lines: &[Line]) -> bool {
    !lines.is_empty() && lines.iter().all(|line| BULLET.is_match(&line.text))
}

/// List item texts with their bullet prefixes stripped.
pub fn list_items(lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .map(|line| BULLET.replace(&line.text, "").trim().to_string())
        .collect()
}

/// Whether a line ends in a leader-dot run plus page number.
pub fn has_leader_suffix(text: &str) -> bool {
    LEADER.is_match(text)
}

/// Strip a trailing leader-dot run and page number, reporting whether a
/// strip occurred. Disabled stripping returns the trimmed text unchanged.
pub fn strip_leader_dots(text: &str, enabled: bool) -> (String, bool) {
    let trimmed = text.trim();
    if !enabled {
        return (trimmed.to_string(), false);
    }
    let cleaned = LEADER.replace(trimmed, "").trim().to_string();
    let stripped = cleaned != trimmed;
    (cleaned, stripped)
}

/// Whether a paragraph looks like a figure caption label.
pub fn is_figure_label(text: &str) -> bool {
    FIGURE_LABEL.is_match(text)
}

/// The document title candidate from the first page: the single largest
/// line, if prominent enough and not absurdly long.
pub fn title_candidate(lines: &[Line], body_size: f32) -> Option<String> {
    let best = lines.iter().max_by(|a, b| {
        a.size
            .partial_cmp(&b.size)
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    if best.size >= body_size * 1.6 && best.text.chars().count() <= 160 {
        Some(best.text.clone())
    } else {
        None
    }
}
