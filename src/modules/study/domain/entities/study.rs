use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled Study";
pub const DEFAULT_URL: &str = "#";
pub const DEFAULT_ORGANIZATION: &str = "Unknown Organization";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Canonical research-study record.
///
/// Only the normalizer builds these from raw input; it guarantees that
/// `categories` is never empty and that `metadata.subjects` is always a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub id: String,
    pub title: String,
    pub url: String,
    pub organization: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub metadata: StudyMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMetadata {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub authors: Vec<String>,
}

impl Study {
    /// Minimal study with every optional field at its default
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: DEFAULT_URL.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            date: String::new(),
            description: String::new(),
            categories: vec![UNCATEGORIZED.to_string()],
            metadata: StudyMetadata::default(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn subjects(&self) -> &[String] {
        &self.metadata.subjects
    }

    /// The categories invariant, checked at the store boundary
    pub fn has_valid_categories(&self) -> bool {
        !self.categories.is_empty() && self.categories.iter().all(|c| !c.trim().is_empty())
    }
}

impl std::fmt::Display for Study {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}
