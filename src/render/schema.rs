//! Structured-data (JSON-LD) generation.

use serde_json::{json, Map, Value};

use crate::model::DocMeta;

/// Build the schema.org JSON-LD block.
///
/// The top-level type is configurable; optional fields appear only when
/// present in the merged metadata. The resolved title is always included
/// under both `name` and `headline`.
pub fn build_schema(meta: &DocMeta, title: &str, schema_type: &str, images: &[String]) -> String {
    let mut data = Map::new();
    data.insert("@context".to_string(), json!("https://schema.org"));
    data.insert("@type".to_string(), json!(schema_type));
    data.insert("name".to_string(), json!(title));
    data.insert("headline".to_string(), json!(title));

    if let Some(author) = &meta.author {
        data.insert(
            "author".to_string(),
            json!({"@type": "Person", "name": author}),
        );
    }
    if let Some(date) = &meta.date {
        data.insert("datePublished".to_string(), json!(date));
    }
    if let Some(description) = &meta.description {
        data.insert("description".to_string(), json!(description));
    }
    if let Some(publisher) = &meta.publisher {
        data.insert(
            "publisher".to_string(),
            json!({"@type": "Organization", "name": publisher}),
        );
    }
    if let Some(lang) = &meta.lang {
        data.insert("inLanguage".to_string(), json!(lang));
    }
    if !meta.keywords.is_empty() {
        data.insert("keywords".to_string(), json!(meta.keywords));
    }
    if !images.is_empty() {
        data.insert("image".to_string(), json!(images));
    }

    serde_json::to_string_pretty(&Value::Object(data)).unwrap_or_default()
}
