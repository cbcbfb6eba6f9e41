//! Client-side catalog of research studies: a retrying CSV bootstrap, a
//! normalizer that enforces the study shape, an event-emitting state store
//! and a fuzzy search plus alias-aware filter pipeline over it.
pub mod modules;
pub mod shared;

pub use modules::catalog::{BootstrapOutcome, StudyCatalog};
pub use modules::filter::{FilterCriteria, FilterEngine};
pub use modules::ingest::{
    parse_studies_csv, BootstrapCoordinator, BootstrapPhase, FileStudySource, HttpStudySource,
    StudySource,
};
pub use modules::search::{IndexStatus, SearchConfig, SearchIndex};
pub use modules::state::{
    DataStatus, FilterChange, ListenerId, StateStore, StoreEvent, StoreEventKind,
    StoreEventPayload,
};
pub use modules::study::{CanonicalCategory, Study, StudyMetadata, StudyNormalizer, ViewMode};
pub use shared::{AppError, AppResult, CatalogConfig, CatalogConfigBuilder};

/// Start a catalog session from `STUDYSCOPE_*` settings and load it.
///
/// Logging is initialized first so the bootstrap attempts are visible.
pub async fn run() -> AppResult<StudyCatalog> {
    shared::utils::init_logger();
    shared::utils::init_tracing();

    let config = CatalogConfig::from_env()?;
    let catalog = StudyCatalog::from_config(config)?;
    let outcome = catalog.bootstrap().await;
    log_info!("Catalog ready ({:?}, status {:?})", outcome, catalog.data_status());

    Ok(catalog)
}
