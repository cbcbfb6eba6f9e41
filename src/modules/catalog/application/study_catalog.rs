use std::collections::BTreeSet;
use std::sync::Arc;

use crate::modules::catalog::domain::BootstrapOutcome;
use crate::modules::filter::FilterEngine;
use crate::modules::ingest::{BootstrapCoordinator, HttpStudySource, StudySource};
use crate::modules::search::SearchIndex;
use crate::modules::state::{
    DataStatus, ListenerId, StateStore, StoreEventKind, StoreEventPayload,
};
use crate::modules::study::{CanonicalCategory, Study};
use crate::shared::config::CatalogConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info, log_warn};

/// One browsing session over the study catalog.
///
/// Owns the state store and the search index, and keeps the index in step
/// with the store: every installed collection triggers a background rebuild
/// when a tokio runtime is available.
pub struct StudyCatalog {
    config: CatalogConfig,
    store: Arc<StateStore>,
    coordinator: BootstrapCoordinator,
    index: SearchIndex,
    filters: FilterEngine,
    index_listener: ListenerId,
}

impl StudyCatalog {
    pub fn new(config: CatalogConfig, source: Arc<dyn StudySource>) -> Self {
        let store = Arc::new(StateStore::new());
        let coordinator = BootstrapCoordinator::new(source, config.retry_policy());
        let index = SearchIndex::new(config.search.clone());

        let listener_index = index.clone();
        let index_listener =
            store.add_event_listener(StoreEventKind::StudiesLoaded, move |event| {
                if let StoreEventPayload::StudiesLoaded { studies } = &event.payload {
                    spawn_index_build(&listener_index, studies.as_ref().clone());
                }
                Ok(())
            });

        Self {
            config,
            store,
            coordinator,
            index,
            filters: FilterEngine::new(),
            index_listener,
        }
    }

    /// Catalog that fetches the study table over HTTP
    pub fn from_config(config: CatalogConfig) -> AppResult<Self> {
        config.validate()?;
        let source = HttpStudySource::from_config(&config)?;
        log_info!("Catalog source: {}", source.describe());
        Ok(Self::new(config, Arc::new(source)))
    }

    /// Load the catalog into the store.
    ///
    /// Concurrent calls share one load. The loaded collection is installed
    /// only if nothing else was installed since this call started. On
    /// exhaustion the store records a `TransportError` and keeps whatever
    /// collection it had, unless a newer collection was installed meanwhile.
    /// Never fails.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let generation = self.store.generation();
        self.store.set_loading(true);

        let studies = self.coordinator.bootstrap().await;

        // A successful run never yields an empty collection
        let outcome = if studies.is_empty() && self.store.generation() != generation {
            log_debug!("Exhausted bootstrap overtaken by a newer collection");
            BootstrapOutcome::Superseded
        } else if studies.is_empty() {
            self.store
                .record_error(AppError::TransportError("catalog unavailable".to_string()));
            BootstrapOutcome::Failed
        } else {
            let count = studies.len();
            if self.store.set_studies_if_current(generation, studies) {
                BootstrapOutcome::Applied { count }
            } else {
                BootstrapOutcome::Superseded
            }
        };

        self.store.set_loading(false);

        if outcome.is_applied() {
            if let Err(error) = self.index.build(self.store.get_studies()).await {
                log_warn!("Search stays in substring mode: {}", error);
            }
        }

        log_info!("Catalog bootstrap finished: {:?}", outcome);
        outcome
    }

    /// Search over the whole collection, then narrow by the active filters
    pub fn filtered_results(&self) -> Vec<Study> {
        let snapshot = self.store.query_snapshot();
        let searched = self.index.search(&snapshot.search_query, &snapshot.studies);
        self.filters.apply(
            &searched,
            &snapshot.category_filters,
            &snapshot.subject_filters,
        )
    }

    /// Canonical labels plus any category that resolves to none of them
    pub fn available_categories(&self) -> Vec<String> {
        let mut categories: BTreeSet<String> = CanonicalCategory::ALL
            .iter()
            .map(|category| category.label().to_string())
            .collect();

        for study in self.store.studies_snapshot().iter() {
            for category in &study.categories {
                if CanonicalCategory::resolve(category).is_none() {
                    categories.insert(category.clone());
                }
            }
        }
        categories.into_iter().collect()
    }

    pub fn available_subjects(&self) -> Vec<String> {
        let subjects: BTreeSet<String> = self
            .store
            .studies_snapshot()
            .iter()
            .flat_map(|study| study.metadata.subjects.iter().cloned())
            .collect();
        subjects.into_iter().collect()
    }

    pub fn data_status(&self) -> DataStatus {
        self.store.data_status()
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn coordinator(&self) -> &BootstrapCoordinator {
        &self.coordinator
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Detach every store listener, including the index rebuild hook
    pub fn teardown(&self) {
        self.store.teardown();
    }
}

impl Drop for StudyCatalog {
    fn drop(&mut self) {
        self.store
            .remove_event_listener(StoreEventKind::StudiesLoaded, self.index_listener);
    }
}

fn spawn_index_build(index: &SearchIndex, studies: Vec<Study>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let build = index.build(studies);
            handle.spawn(async move {
                if let Err(error) = build.await {
                    log_debug!("Background index build failed: {}", error);
                }
            });
        }
        Err(_) => {
            log_debug!("No async runtime; index rebuild deferred to the next bootstrap");
        }
    }
}
