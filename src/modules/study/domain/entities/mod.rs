mod study;

pub use study::{
    Study, StudyMetadata, DEFAULT_ORGANIZATION, DEFAULT_TITLE, DEFAULT_URL, UNCATEGORIZED,
};
