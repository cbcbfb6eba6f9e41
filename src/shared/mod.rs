// Shared kernel used by every feature module

pub mod config; // Catalog configuration (env + builder)
pub mod errors; // Shared error types
pub mod utils; // Logging, retry policy, validation

pub use config::{CatalogConfig, CatalogConfigBuilder};
pub use errors::{AppError, AppResult};
