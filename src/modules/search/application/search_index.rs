use futures::future::{self, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::modules::search::domain::{substring_search, FuzzyIndex, SearchConfig};
use crate::modules::study::Study;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{LogContext, TimedOperation};
use crate::{log_debug, log_error};

/// Clonable handle to an index build; resolves to the number of documents
pub type BuildFuture = Shared<BoxFuture<'static, AppResult<usize>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    NotBuilt,
    Building,
    Ready { documents: usize },
    /// Permanent for the lifetime of this index
    Failed { reason: String },
}

#[derive(Default)]
struct IndexState {
    ready: Option<Arc<FuzzyIndex>>,
    building: Option<BuildFuture>,
    failed: Option<AppError>,
}

/// Fuzzy study index with a substring fallback.
///
/// Cheap to clone; clones share the same index. While a rebuild is running
/// queries keep using the previous index. Once a build has failed the
/// index stays in fallback mode and later builds return the same error.
#[derive(Clone)]
pub struct SearchIndex {
    config: Arc<SearchConfig>,
    state: Arc<Mutex<IndexState>>,
}

impl SearchIndex {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(IndexState::default())),
        }
    }

    /// Build the index off the async executor, or join the build in flight.
    ///
    /// Like the bootstrap coordinator, the build is registered on call, so
    /// back-to-back callers always share it. A call made while a build is
    /// in flight gets that build even if it passed a different collection;
    /// studies missing from the index are still scored at query time.
    pub fn build(&self, studies: Vec<Study>) -> BuildFuture {
        let mut state = self.state.lock();

        if let Some(error) = state.failed.clone() {
            log_debug!("Search index previously failed, not rebuilding");
            return future::ready(Err(error)).boxed().shared();
        }

        if let Some(existing) = state.building.as_ref() {
            if existing.peek().is_none() {
                log_debug!("Search index build already in flight, joining it");
                return existing.clone();
            }
        }

        let config = self.config.clone();
        let shared_state = self.state.clone();
        let run = async move {
            let timer = TimedOperation::new("search index build");
            let built = tokio::task::spawn_blocking(move || {
                FuzzyIndex::build(config.as_ref().clone(), &studies)
            })
            .await
            .map_err(|err| AppError::IndexBuildError(format!("index task failed: {}", err)))
            .and_then(|result| result);

            let mut state = shared_state.lock();
            match built {
                Ok(index) => {
                    let documents = index.len();
                    state.ready = Some(Arc::new(index));
                    timer.finish_with_info(&format!("{} documents", documents));
                    Ok(documents)
                }
                Err(error) => {
                    log_error!(
                        "Search index build failed, using substring search for this session: {}",
                        error
                    );
                    state.ready = None;
                    state.failed = Some(error.clone());
                    Err(error)
                }
            }
        }
        .boxed()
        .shared();

        state.building = Some(run.clone());
        run
    }

    /// Rank `studies` against `query`.
    ///
    /// A blank query returns `studies` unchanged. Without a usable index
    /// this is a case-insensitive substring match in input order.
    pub fn search(&self, query: &str, studies: &[Study]) -> Vec<Study> {
        let query = query.trim();
        if query.is_empty() {
            return studies.to_vec();
        }

        let (ready, failed) = {
            let state = self.state.lock();
            (state.ready.clone(), state.failed.clone())
        };

        let (results, mode) = match ready {
            Some(index) => (index.search(query, studies), "fuzzy"),
            None => {
                let reason = failed
                    .map(|error| error.to_string())
                    .unwrap_or_else(|| "index not built yet".to_string());
                log_debug!("Substring fallback for '{}': {}", query, reason);
                (substring_search(query, studies), "fallback")
            }
        };

        LogContext::search_operation(query, Some(mode), Some(results.len()));
        results
    }

    pub fn status(&self) -> IndexStatus {
        let state = self.state.lock();
        if let Some(error) = &state.failed {
            return IndexStatus::Failed {
                reason: error.to_string(),
            };
        }
        if let Some(building) = &state.building {
            if building.peek().is_none() {
                return IndexStatus::Building;
            }
        }
        match &state.ready {
            Some(index) => IndexStatus::Ready {
                documents: index.len(),
            },
            None => IndexStatus::NotBuilt,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status(), IndexStatus::Ready { .. })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
