use std::collections::BTreeSet;

use crate::modules::study::{CategoryAliasTable, Study};

/// Active category and subject filters, as copied out of the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub subjects: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new(categories: BTreeSet<String>, subjects: BTreeSet<String>) -> Self {
        Self {
            categories,
            subjects,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.subjects.is_empty()
    }
}

/// Narrows a candidate list by category (alias aware) and subject membership
pub struct FilterEngine {
    aliases: &'static CategoryAliasTable,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    pub fn new() -> Self {
        Self {
            aliases: CategoryAliasTable::global(),
        }
    }

    /// Keep the studies that pass both filters, in input order.
    ///
    /// An empty filter set passes everything. With category filters, a
    /// study passes if any of its categories matches any filter exactly or
    /// through the alias table. With subject filters, its subjects must
    /// intersect the filter set, so a study without subjects is dropped.
    pub fn apply(
        &self,
        studies: &[Study],
        category_filters: &BTreeSet<String>,
        subject_filters: &BTreeSet<String>,
    ) -> Vec<Study> {
        studies
            .iter()
            .filter(|study| {
                self.passes_categories(study, category_filters)
                    && passes_subjects(study, subject_filters)
            })
            .cloned()
            .collect()
    }

    pub fn apply_criteria(&self, studies: &[Study], criteria: &FilterCriteria) -> Vec<Study> {
        self.apply(studies, &criteria.categories, &criteria.subjects)
    }

    fn passes_categories(&self, study: &Study, filters: &BTreeSet<String>) -> bool {
        if filters.is_empty() {
            return true;
        }
        study.categories.iter().any(|category| {
            filters
                .iter()
                .any(|filter| self.aliases.matches(category, filter))
        })
    }
}

fn passes_subjects(study: &Study, filters: &BTreeSet<String>) -> bool {
    filters.is_empty()
        || study
            .metadata
            .subjects
            .iter()
            .any(|subject| filters.contains(subject))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn ids(studies: &[Study]) -> Vec<String> {
        studies.iter().map(|s| s.id.clone()).collect()
    }

    fn corpus() -> Vec<Study> {
        vec![
            Study::new("legacy", "Teacher survey")
                .with_categories(["Current AI Use and Perceptions in PK 12 & HigherEd"]),
            Study::new("jobs", "AI and Jobs")
                .with_categories(["Workforce Trends"])
                .with_subjects(["economics"]),
            Study::new("scores", "Reading scores")
                .with_categories(["Student Performance Data", "Workforce Trends"])
                .with_subjects(["literacy", "economics"]),
        ]
    }

    #[test]
    fn test_empty_filters_pass_everything() {
        let engine = FilterEngine::new();
        assert_eq!(engine.apply(&corpus(), &set(&[]), &set(&[])), corpus());
    }

    #[test]
    fn test_canonical_filter_matches_legacy_category() {
        let engine = FilterEngine::new();
        let result = engine.apply(&corpus(), &set(&["AI Use and Perceptions"]), &set(&[]));
        assert_eq!(ids(&result), vec!["legacy"]);
    }

    #[test]
    fn test_any_filter_matches() {
        let engine = FilterEngine::new();
        let result = engine.apply(
            &corpus(),
            &set(&["Student Performance Data", "AI Use and Perceptions"]),
            &set(&[]),
        );
        assert_eq!(ids(&result), vec!["legacy", "scores"]);
    }

    #[test]
    fn test_subject_filter_requires_intersection() {
        let engine = FilterEngine::new();
        let result = engine.apply(&corpus(), &set(&[]), &set(&["literacy"]));
        assert_eq!(ids(&result), vec!["scores"]);
    }

    #[test]
    fn test_filters_compose() {
        let engine = FilterEngine::new();
        let criteria = FilterCriteria::new(set(&["Workforce Trends"]), set(&["economics"]));
        assert_eq!(ids(&engine.apply_criteria(&corpus(), &criteria)), vec!["jobs", "scores"]);

        let none = FilterCriteria::new(set(&["Workforce Trends"]), set(&["biology"]));
        assert!(engine.apply_criteria(&corpus(), &none).is_empty());
    }
}
