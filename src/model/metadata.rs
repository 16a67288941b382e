//! Document metadata: a flat mapping accumulated from three layers.
//!
//! Priority, lowest first: source-reported document properties, a JSON
//! override file, explicit per-run overrides. A later layer overwrites a
//! key only when its value is non-empty.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::layout::SourceMetadata;

/// Merged document metadata used for the HTML head, header, and schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Publication date, ISO `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Language code (e.g., "en", "sk").
    pub lang: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
    /// Source filename, set by the converter.
    pub source: Option<String>,
}

impl DocMeta {
    /// Metadata reported by the layout source, normalized.
    pub fn from_source(source: &SourceMetadata) -> Self {
        Self {
            title: clean(source.title.clone()),
            author: clean(source.author.clone()),
            date: source.created.as_deref().and_then(parse_pdf_date),
            keywords: source
                .keywords
                .as_deref()
                .map(split_keywords)
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Load the JSON override file. The file must contain a JSON object;
    /// anything else is rejected before any document is processed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| Error::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Overlay `other` onto `self`: each non-empty field of `other` wins.
    pub fn apply(&mut self, other: &DocMeta) {
        overlay(&mut self.title, &other.title);
        overlay(&mut self.author, &other.author);
        overlay(&mut self.date, &other.date);
        overlay(&mut self.lang, &other.lang);
        overlay(&mut self.publisher, &other.publisher);
        overlay(&mut self.description, &other.description);
        overlay(&mut self.source, &other.source);
        if !other.keywords.is_empty() {
            self.keywords = other.keywords.clone();
        }
    }

    /// Keywords joined for the `<meta name="keywords">` tag.
    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }

    /// Language code with the "undetermined" default.
    pub fn lang_or_und(&self) -> &str {
        self.lang.as_deref().unwrap_or("und")
    }
}

fn overlay(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            *slot = Some(v.clone());
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Split a comma-separated keyword string, dropping empties.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS...`) into ISO `YYYY-MM-DD`.
fn parse_pdf_date(raw: &str) -> Option<String> {
    let digits = raw.strip_prefix("D:").unwrap_or(raw);
    if digits.len() < 8 {
        return None;
    }
    NaiveDate::parse_from_str(&digits[..8], "%Y%m%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Accept `keywords` as either an array of strings or a comma-separated string.
fn deserialize_keywords<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<String>),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Repr::List(items)) => Ok(items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()),
        Some(Repr::Text(text)) => Ok(split_keywords(&text)),
    }
}
