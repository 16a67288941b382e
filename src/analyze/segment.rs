//! Contents-page detection.
//!
//! A page is treated as a table-of-contents page when enough of its lines
//! end in a leader-dot run followed by a page number.

use crate::analyze::classify::has_leader_suffix;
use crate::layout::PageLayout;

/// Leader-line count at which a whole page counts as a contents page.
pub const TOC_LEADER_MIN: usize = 5;

/// Scan a page's text lines for leader-dot entries.
pub fn page_is_toc(page: &PageLayout) -> bool {
    let mut count = 0;
    for raw in page.text_lines() {
        let text: String = raw
            .spans
            .iter()
            .map(|span| span.text.as_str())
            .collect::<String>()
            .trim()
            .to_string();
        if !text.is_empty() && has_leader_suffix(&text) {
            count += 1;
            if count >= TOC_LEADER_MIN {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BBox, Block, RawLine, Span};

    fn text_page(lines: &[&str]) -> PageLayout {
        let mut page = PageLayout::new(1);
        page.blocks.push(Block::Text {
            bbox: BBox::default(),
            lines: lines
                .iter()
                .map(|t| RawLine::new(vec![Span::new(*t, "F", 10.0)]))
                .collect(),
        });
        page
    }

    #[test]
    fn test_page_with_enough_leaders_is_toc() {
        let entries: Vec<String> = (1..=5)
            .map(|i| format!("{i}. Chapter {i} ......... {i}"))
            .collect();
        let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
        assert!(page_is_toc(&text_page(&refs)));
    }

    #[test]
    fn test_page_below_threshold_is_not_toc() {
        let entries: Vec<String> = (1..=4)
            .map(|i| format!("{i}. Chapter {i} ......... {i}"))
            .collect();
        let mut refs: Vec<&str> = entries.iter().map(String::as_str).collect();
        refs.push("An ordinary paragraph line");
        assert!(!page_is_toc(&text_page(&refs)));
    }

    #[test]
    fn test_leaders_counted_across_blocks() {
        let mut page = PageLayout::new(1);
        for i in 1..=5 {
            let entry = format!("{i}. Chapter ....... {i}");
            page.blocks.push(Block::Text {
                bbox: BBox::default(),
                lines: vec![RawLine::new(vec![Span::new(entry, "F", 10.0)])],
            });
        }
        assert!(page_is_toc(&page));
    }
}
