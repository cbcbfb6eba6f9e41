mod filter_engine;

pub use filter_engine::{FilterCriteria, FilterEngine};
