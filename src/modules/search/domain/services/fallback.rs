use crate::modules::study::Study;

/// Case-insensitive substring match across every searchable field.
///
/// Deterministic and dependency free: the result keeps the input order and
/// contains every study with at least one matching field. A blank query
/// returns the input unchanged.
pub fn substring_search(query: &str, studies: &[Study]) -> Vec<Study> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return studies.to_vec();
    }

    studies
        .iter()
        .filter(|study| matches_any_field(study, &needle))
        .cloned()
        .collect()
}

fn matches_any_field(study: &Study, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    contains(&study.title)
        || study.categories.iter().any(|c| contains(c))
        || contains(&study.description)
        || study.metadata.subjects.iter().any(|s| contains(s))
        || contains(&study.organization)
}
