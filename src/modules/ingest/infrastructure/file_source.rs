use async_trait::async_trait;
use std::path::PathBuf;

use super::csv_parser::parse_studies_csv;
use crate::modules::ingest::domain::StudySource;
use crate::modules::study::RawRecord;
use crate::shared::errors::AppResult;

/// Reads the study table from a local file
pub struct FileStudySource {
    path: PathBuf,
}

impl FileStudySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StudySource for FileStudySource {
    async fn load(&self) -> AppResult<Vec<RawRecord>> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_studies_csv(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
