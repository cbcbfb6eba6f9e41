use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::{Duration, Instant};
use tracing::debug;

use super::csv_parser::parse_studies_csv;
use crate::modules::ingest::domain::StudySource;
use crate::modules::study::RawRecord;
use crate::shared::config::CatalogConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::LogContext;

/// Fetches the study table over HTTP GET
pub struct HttpStudySource {
    client: Client,
    url: Url,
}

impl HttpStudySource {
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    pub fn from_config(config: &CatalogConfig) -> AppResult<Self> {
        Self::new(
            config.resource_url()?,
            config.request_timeout,
            &config.user_agent,
        )
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn check_status(&self, status: StatusCode) -> AppResult<()> {
        if status.is_success() {
            return Ok(());
        }
        Err(AppError::TransportError(format!(
            "GET {} returned {}",
            self.url, status
        )))
    }
}

#[async_trait]
impl StudySource for HttpStudySource {
    async fn load(&self) -> AppResult<Vec<RawRecord>> {
        let started = Instant::now();
        LogContext::fetch(self.url.as_str(), "started", None);

        let response = self.client.get(self.url.clone()).send().await?;
        self.check_status(response.status())?;

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);

        let records = parse_studies_csv(&body)?;
        LogContext::fetch(
            self.url.as_str(),
            &format!("parsed {} rows", records.len()),
            Some(started.elapsed().as_millis() as u64),
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
