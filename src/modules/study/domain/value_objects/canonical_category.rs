use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// The four top-level filter labels shown to users.
///
/// Source data uses several older or more verbose spellings for each of
/// them; `CategoryAliasTable` maps those back onto a canonical label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalCategory {
    AiUseAndPerceptions,
    GuidelinesTrainingPolicies,
    StudentPerformanceData,
    WorkforceTrends,
}

impl CanonicalCategory {
    pub const ALL: [CanonicalCategory; 4] = [
        CanonicalCategory::AiUseAndPerceptions,
        CanonicalCategory::GuidelinesTrainingPolicies,
        CanonicalCategory::StudentPerformanceData,
        CanonicalCategory::WorkforceTrends,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CanonicalCategory::AiUseAndPerceptions => "AI Use and Perceptions",
            CanonicalCategory::GuidelinesTrainingPolicies => "Guidelines, Training, Policies",
            CanonicalCategory::StudentPerformanceData => "Student Performance Data",
            CanonicalCategory::WorkforceTrends => "Workforce Trends",
        }
    }

    /// Legacy source strings that mean exactly this category
    fn legacy_labels(&self) -> &'static [&'static str] {
        match self {
            CanonicalCategory::AiUseAndPerceptions => &[
                "Current AI Use and Perceptions in PK 12 & HigherEd",
                "Current AI Use and Perceptions in PK-12 & HigherEd",
                "AI Use & Perceptions",
            ],
            CanonicalCategory::GuidelinesTrainingPolicies => &[
                "Guidelines, Training, and Policies",
                "AI Guidelines, Training, and Policies",
                "Guidelines and Policies",
            ],
            CanonicalCategory::StudentPerformanceData => &[
                "Student Performance Data with AI Use",
                "Student Performance",
            ],
            CanonicalCategory::WorkforceTrends => &["Workforce Trends and AI", "AI Workforce Trends"],
        }
    }

    /// Lowercase fragments; any category containing one resolves here
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            CanonicalCategory::AiUseAndPerceptions => &["ai use", "ai perceptions"],
            CanonicalCategory::GuidelinesTrainingPolicies => &["guidelines", "policies", "policy"],
            CanonicalCategory::StudentPerformanceData => &["student performance", "performance data"],
            CanonicalCategory::WorkforceTrends => &["workforce"],
        }
    }

    /// Resolve any category string through the cached alias table
    pub fn resolve(category: &str) -> Option<CanonicalCategory> {
        CategoryAliasTable::global().resolve(category)
    }
}

impl fmt::Display for CanonicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Alias lookup built once from `CanonicalCategory`'s tables.
///
/// `resolve` picks a single label: canonical label or legacy string
/// (case-insensitive, whitespace-trimmed), then the first keyword hit in
/// `CanonicalCategory::ALL` order. `matches` is membership instead, so one
/// category can satisfy filters for several labels.
#[derive(Debug)]
pub struct CategoryAliasTable {
    exact: HashMap<String, CanonicalCategory>,
    keywords: Vec<(&'static str, CanonicalCategory)>,
}

static ALIAS_TABLE: LazyLock<CategoryAliasTable> = LazyLock::new(CategoryAliasTable::build);

impl CategoryAliasTable {
    pub fn global() -> &'static CategoryAliasTable {
        &ALIAS_TABLE
    }

    fn build() -> Self {
        let mut exact = HashMap::new();
        let mut keywords = Vec::new();

        for category in CanonicalCategory::ALL {
            exact.insert(category.label().to_lowercase(), category);
            for legacy in category.legacy_labels() {
                exact.insert(legacy.to_lowercase(), category);
            }
            for keyword in category.keywords() {
                keywords.push((*keyword, category));
            }
        }

        Self { exact, keywords }
    }

    pub fn resolve(&self, category: &str) -> Option<CanonicalCategory> {
        let needle = category.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(found) = self.exact.get(&needle) {
            return Some(*found);
        }

        self.keywords
            .iter()
            .find(|(keyword, _)| needle.contains(keyword))
            .map(|(_, category)| *category)
    }

    /// Whether a study category satisfies an active filter value.
    ///
    /// Exact equality always matches. Otherwise the filter is resolved to a
    /// canonical label and the category must belong to that label.
    pub fn matches(&self, study_category: &str, filter: &str) -> bool {
        if study_category == filter {
            return true;
        }

        self.resolve(filter)
            .is_some_and(|wanted| self.belongs_to(study_category, wanted))
    }

    /// Whether `category` is `canonical`'s label or one of its legacy
    /// spellings, or contains one of its keywords
    pub fn belongs_to(&self, category: &str, canonical: CanonicalCategory) -> bool {
        let needle = category.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }

        self.exact.get(&needle) == Some(&canonical)
            || canonical
                .keywords()
                .iter()
                .any(|keyword| needle.contains(keyword))
    }
}
