pub mod domain;

pub use domain::{FilterCriteria, FilterEngine};
