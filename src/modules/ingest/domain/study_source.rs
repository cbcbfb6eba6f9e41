use async_trait::async_trait;

use crate::modules::study::RawRecord;
use crate::shared::errors::AppResult;

/// Port (interface) for fetching the raw study table.
///
/// Implementations fetch and parse once per call and never retry; the
/// bootstrap coordinator owns the retry policy.
#[async_trait]
pub trait StudySource: Send + Sync {
    /// Fetch and parse the resource into string-keyed records
    async fn load(&self) -> AppResult<Vec<RawRecord>>;

    /// Human-readable locator for logs
    fn describe(&self) -> String;
}
