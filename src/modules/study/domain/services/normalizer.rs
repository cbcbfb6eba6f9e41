use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::modules::study::domain::entities::{
    Study, StudyMetadata, DEFAULT_ORGANIZATION, DEFAULT_TITLE, DEFAULT_URL, UNCATEGORIZED,
};

/// Untrusted input record as produced by a loader (or handed over by a caller)
pub type RawRecord = Value;

const CATEGORY_DELIMITERS: &[char] = &['|'];
// Category names contain commas ("Guidelines, Training, Policies"), list-valued
// metadata does not.
const LIST_DELIMITERS: &[char] = &['|', ','];

/// Turns raw tabular records into canonical `Study` values.
///
/// Pure and infallible: anything that cannot be coerced falls back to a
/// default instead of failing the batch. Entries that are not objects are
/// dropped. Output never aliases the input; every string is freshly owned.
pub struct StudyNormalizer;

impl StudyNormalizer {
    pub fn normalize(records: &[RawRecord]) -> Vec<Study> {
        let studies: Vec<Study> = records
            .iter()
            .filter_map(|record| record.as_object())
            .map(Self::normalize_record)
            .collect();

        let dropped = records.len() - studies.len();
        if dropped > 0 {
            debug!("Normalizer dropped {} non-record entries", dropped);
        }

        studies
    }

    pub fn normalize_record(record: &Map<String, Value>) -> Study {
        let description = scalar_field(record, "description")
            .or_else(|| scalar_field(record, "key_findings"))
            .unwrap_or_default();

        Study {
            id: coerce_id(record.get("id")),
            title: scalar_field(record, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            url: scalar_field(record, "url").unwrap_or_else(|| DEFAULT_URL.to_string()),
            organization: scalar_field(record, "organization")
                .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string()),
            date: scalar_field(record, "date").unwrap_or_default(),
            description,
            categories: coerce_categories(record.get("categories")),
            metadata: coerce_metadata(record),
        }
    }
}

fn coerce_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

fn coerce_scalar(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn scalar_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(coerce_scalar)
}

/// Accepts a list or a delimited string; trims, drops empties and repeats
fn coerce_list(value: Option<&Value>, delimiters: &[char]) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_scalar).collect(),
        Some(Value::String(s)) => s.split(delimiters).map(|part| part.trim().to_string()).collect(),
        Some(other) => coerce_scalar(other).into_iter().collect(),
        None => Vec::new(),
    };

    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_empty() && !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn coerce_categories(value: Option<&Value>) -> Vec<String> {
    let categories = coerce_list(value, CATEGORY_DELIMITERS);
    if categories.is_empty() {
        vec![UNCATEGORIZED.to_string()]
    } else {
        categories
    }
}

/// Parses `subjects=math,science|year=2024` into an object
fn parse_metadata_string(raw: &str) -> Map<String, Value> {
    raw.split('|')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| {
            (
                key.trim().to_lowercase(),
                Value::String(value.trim().to_string()),
            )
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn coerce_metadata(record: &Map<String, Value>) -> StudyMetadata {
    let parsed;
    let metadata = match record.get("metadata") {
        Some(Value::Object(map)) => Some(map),
        Some(Value::String(raw)) => {
            parsed = parse_metadata_string(raw);
            Some(&parsed)
        }
        _ => None,
    };

    // Metadata wins; top-level columns fill the gaps.
    let lookup = |key: &str| -> Option<&Value> {
        metadata
            .and_then(|m| m.get(key))
            .filter(|v| !v.is_null())
            .or_else(|| record.get(key))
    };

    StudyMetadata {
        subjects: coerce_list(lookup("subjects"), LIST_DELIMITERS),
        year: lookup("year").and_then(coerce_scalar).unwrap_or_default(),
        authors: coerce_list(lookup("authors"), LIST_DELIMITERS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_non_records() {
        let records = vec![json!(null), json!(42), json!("row"), json!([1, 2]), json!({})];
        let studies = StudyNormalizer::normalize(&records);
        assert_eq!(studies.len(), 1);
    }

    #[test]
    fn test_defaults_for_empty_record() {
        let studies = StudyNormalizer::normalize(&[json!({})]);
        let study = &studies[0];
        assert_eq!(study.title, DEFAULT_TITLE);
        assert_eq!(study.url, DEFAULT_URL);
        assert_eq!(study.organization, DEFAULT_ORGANIZATION);
        assert_eq!(study.date, "");
        assert_eq!(study.description, "");
        assert_eq!(study.categories, vec![UNCATEGORIZED]);
        assert!(study.metadata.subjects.is_empty());
        assert!(!study.id.is_empty());
    }

    #[test]
    fn test_id_coercion() {
        let studies = StudyNormalizer::normalize(&[
            json!({"id": "abc"}),
            json!({"id": 17}),
            json!({"id": {"nested": true}}),
            json!({"id": "   "}),
        ]);
        assert_eq!(studies[0].id, "abc");
        assert_eq!(studies[1].id, "17");
        assert!(Uuid::parse_str(&studies[2].id).is_ok());
        assert!(Uuid::parse_str(&studies[3].id).is_ok());
        assert_ne!(studies[2].id, studies[3].id);
    }

    #[test]
    fn test_categories_from_pipe_string() {
        let studies = StudyNormalizer::normalize(&[json!({
            "categories": " Workforce Trends | | Guidelines, Training, Policies |Workforce Trends"
        })]);
        assert_eq!(
            studies[0].categories,
            vec!["Workforce Trends", "Guidelines, Training, Policies"]
        );
    }

    #[test]
    fn test_categories_from_list_and_blank_fallback() {
        let studies = StudyNormalizer::normalize(&[
            json!({"categories": ["A", " B ", ""]}),
            json!({"categories": ["", "  "]}),
            json!({"categories": null}),
        ]);
        assert_eq!(studies[0].categories, vec!["A", "B"]);
        assert_eq!(studies[1].categories, vec![UNCATEGORIZED]);
        assert_eq!(studies[2].categories, vec![UNCATEGORIZED]);
    }

    #[test]
    fn test_metadata_string_parsing() {
        let studies = StudyNormalizer::normalize(&[json!({
            "metadata": "subjects=math, science|year=2023|authors=Lee,Kim|unknown=1"
        })]);
        let metadata = &studies[0].metadata;
        assert_eq!(metadata.subjects, vec!["math", "science"]);
        assert_eq!(metadata.year, "2023");
        assert_eq!(metadata.authors, vec!["Lee", "Kim"]);
    }

    #[test]
    fn test_metadata_object_and_top_level_fallback() {
        let studies = StudyNormalizer::normalize(&[json!({
            "metadata": {"subjects": "history", "year": 2021},
            "authors": ["Ng"]
        })]);
        let metadata = &studies[0].metadata;
        assert_eq!(metadata.subjects, vec!["history"]);
        assert_eq!(metadata.year, "2021");
        assert_eq!(metadata.authors, vec!["Ng"]);
    }

    #[test]
    fn test_key_findings_become_description() {
        let studies = StudyNormalizer::normalize(&[
            json!({"key_findings": "AI changes jobs"}),
            json!({"description": "primary", "key_findings": "secondary"}),
        ]);
        assert_eq!(studies[0].description, "AI changes jobs");
        assert_eq!(studies[1].description, "primary");
    }

    #[test]
    fn test_output_does_not_alias_input() {
        let mut records = vec![json!({"title": "Original", "categories": ["X"]})];
        let studies = StudyNormalizer::normalize(&records);
        records[0]["title"] = json!("Changed");
        records[0]["categories"][0] = json!("Y");
        assert_eq!(studies[0].title, "Original");
        assert_eq!(studies[0].categories, vec!["X"]);
    }
}
