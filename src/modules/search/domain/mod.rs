pub mod config;
pub mod services;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use services::{substring_search, FuzzyIndex, FuzzyRanker};
