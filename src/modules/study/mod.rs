pub mod domain;

pub use domain::{
    CanonicalCategory, CategoryAliasTable, RawRecord, Study, StudyMetadata, StudyNormalizer,
    ViewMode,
};
