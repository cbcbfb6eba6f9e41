/// Test data factories using builder pattern
///
/// Provides convenient methods to create studies and raw rows with sensible defaults
use serde_json::{json, Value};
use studyscope_lib::Study;

pub struct StudyFactory {
    id: String,
    title: String,
    organization: Option<String>,
    description: String,
    categories: Vec<String>,
    subjects: Vec<String>,
}

impl Default for StudyFactory {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Test Study".to_string(),
            organization: None,
            description: String::new(),
            categories: vec!["Workforce Trends".to_string()],
            subjects: Vec::new(),
        }
    }
}

impl StudyFactory {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn subjects(mut self, subjects: &[&str]) -> Self {
        self.subjects = subjects.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn organization(mut self, organization: &str) -> Self {
        self.organization = Some(organization.to_string());
        self
    }

    pub fn build(self) -> Study {
        let mut study = Study::new(self.id, self.title)
            .with_categories(self.categories)
            .with_subjects(self.subjects)
            .with_description(self.description);
        if let Some(organization) = self.organization {
            study = study.with_organization(organization);
        }
        study
    }
}

/// The raw row used throughout the catalog walkthrough
pub fn scenario_a_record() -> Value {
    json!({
        "id": "1",
        "categories": "Workforce Trends",
        "title": "AI and Jobs",
        "organization": "ExampleOrg",
        "date": "2024-05",
        "key_findings": "AI changes jobs",
        "url": "http://x",
        "metadata": "subjects=economics"
    })
}

/// Small catalog covering every canonical category plus a legacy alias
pub fn sample_catalog() -> Vec<Study> {
    vec![
        StudyFactory::new("1", "AI and Jobs")
            .categories(&["Workforce Trends"])
            .subjects(&["economics"])
            .organization("ExampleOrg")
            .description("AI changes jobs")
            .build(),
        StudyFactory::new("2", "Teacher perceptions of chatbots")
            .categories(&["Current AI Use and Perceptions in PK 12 & HigherEd"])
            .subjects(&["education"])
            .build(),
        StudyFactory::new("3", "Statewide reading scores")
            .categories(&["Student Performance Data"])
            .subjects(&["literacy", "education"])
            .build(),
        StudyFactory::new("4", "District AI policy handbook")
            .categories(&["Guidelines, Training, Policies"])
            .description("Guidance for responsible classroom use")
            .build(),
    ]
}

pub const SAMPLE_CSV: &str = "\
id,categories,title,organization,date,key_findings,url,metadata
1,Workforce Trends,AI and Jobs,ExampleOrg,2024-05,AI changes jobs,http://x,subjects=economics
2,\"Current AI Use and Perceptions in PK 12 & HigherEd\",\"Teachers, chatbots and trust\",EdLab,2023,Most teachers tried AI,http://y,\"subjects=education,ethics|year=2023\"
";
