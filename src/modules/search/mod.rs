//! Study search: a weighted fuzzy index with a substring fallback that
//! keeps search available whenever the index is missing or broken.
pub mod application;
pub mod domain;

pub use application::{BuildFuture, IndexStatus, SearchIndex};
pub use domain::{substring_search, SearchConfig, SearchConfigBuilder};
