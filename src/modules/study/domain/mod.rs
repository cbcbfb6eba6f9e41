pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::{Study, StudyMetadata};
pub use services::{RawRecord, StudyNormalizer};
pub use value_objects::{CanonicalCategory, CategoryAliasTable, ViewMode};
