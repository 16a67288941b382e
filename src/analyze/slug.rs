//! URL-safe heading identifiers.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\-]").unwrap());
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Derive a slug: lowercase, non-alphanumerics stripped, whitespace and
/// hyphen runs collapsed to single hyphens. Falls back when nothing is left.
pub fn slugify(text: &str, fallback: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    let cleaned = NON_SLUG.replace_all(&dashed, "");
    let collapsed = DASH_RUN.replace_all(&cleaned, "-");
    let slug = collapsed.trim_matches('-');
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// Issues slugs unique across a whole document, suffixing repeats with an
/// incrementing counter (`introduction`, `introduction-2`, ...).
#[derive(Debug, Default)]
pub struct SlugSet {
    seen: HashMap<String, u32>,
}

impl SlugSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, text: &str, fallback: &str) -> String {
        let base = slugify(text, fallback);
        match self.seen.get_mut(&base) {
            None => {
                self.seen.insert(base.clone(), 1);
                base
            }
            Some(count) => {
                *count += 1;
                format!("{}-{}", base, count)
            }
        }
    }
}
