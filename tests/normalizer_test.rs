//! Normalizer tests
//!
//! Covers the study shape guarantees on messy input, idempotence on
//! already-normalized studies, and the CSV-to-study path end to end.
mod utils;

use serde_json::{json, Value};
use studyscope_lib::modules::study::domain::entities::UNCATEGORIZED;
use studyscope_lib::{parse_studies_csv, StudyNormalizer};
use utils::factories::{sample_catalog, scenario_a_record, SAMPLE_CSV};

fn messy_records() -> Vec<Value> {
    vec![
        json!({}),
        json!({"categories": null}),
        json!({"categories": ""}),
        json!({"categories": " | |"}),
        json!({"categories": []}),
        json!({"categories": [null, "", "  "]}),
        json!({"categories": 7}),
        json!({"categories": {"nested": "object"}}),
        json!({"categories": ["Workforce Trends", 3, true]}),
        json!({"metadata": "subjects=|year="}),
        json!({"metadata": {"subjects": "a, b ,a"}}),
        json!({"metadata": 12, "subjects": ["x"]}),
    ]
}

#[test]
fn every_study_has_at_least_one_category() {
    let studies = StudyNormalizer::normalize(&messy_records());
    assert_eq!(studies.len(), messy_records().len());

    for study in &studies {
        assert!(!study.categories.is_empty(), "{:?}", study);
        assert!(study.has_valid_categories(), "{:?}", study);
    }
}

#[test]
fn subjects_are_always_a_list() {
    let studies = StudyNormalizer::normalize(&messy_records());

    assert!(studies[9].metadata.subjects.is_empty());
    assert_eq!(studies[10].metadata.subjects, vec!["a", "b"]);
    assert_eq!(studies[11].metadata.subjects, vec!["x"]);
}

#[test]
fn normalizing_normalized_studies_is_identity() {
    let studies = sample_catalog();
    let serialized: Vec<Value> = studies
        .iter()
        .map(|study| serde_json::to_value(study).unwrap())
        .collect();

    assert_eq!(StudyNormalizer::normalize(&serialized), studies);

    let once = StudyNormalizer::normalize(&messy_records());
    let again: Vec<Value> = once
        .iter()
        .map(|study| serde_json::to_value(study).unwrap())
        .collect();
    assert_eq!(StudyNormalizer::normalize(&again), once);
}

#[test]
fn scenario_a_row_normalizes() {
    let studies = StudyNormalizer::normalize(&[scenario_a_record()]);
    let study = &studies[0];

    assert_eq!(study.id, "1");
    assert_eq!(study.categories, vec!["Workforce Trends"]);
    assert_eq!(study.metadata.subjects, vec!["economics"]);
    assert_eq!(study.description, "AI changes jobs");
    assert_eq!(study.organization, "ExampleOrg");
    assert_eq!(study.url, "http://x");
}

#[test]
fn missing_categories_become_uncategorized() {
    let mut record = scenario_a_record();
    record.as_object_mut().unwrap().remove("categories");

    let studies = StudyNormalizer::normalize(&[record]);
    assert_eq!(studies[0].categories, vec![UNCATEGORIZED]);
}

#[test]
fn caller_input_is_not_aliased() {
    let mut records = vec![scenario_a_record()];
    let studies = StudyNormalizer::normalize(&records);

    records[0]["title"] = json!("changed after the fact");
    assert_eq!(studies[0].title, "AI and Jobs");
}

#[test]
fn csv_rows_flow_through_the_normalizer() {
    let records = parse_studies_csv(SAMPLE_CSV).unwrap();
    let studies = StudyNormalizer::normalize(&records);

    assert_eq!(studies.len(), 2);
    assert_eq!(studies[1].title, "Teachers, chatbots and trust");
    assert_eq!(
        studies[1].categories,
        vec!["Current AI Use and Perceptions in PK 12 & HigherEd"]
    );
    assert_eq!(studies[1].metadata.subjects, vec!["education", "ethics"]);
    assert_eq!(studies[1].metadata.year, "2023");
}
