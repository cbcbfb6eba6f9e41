pub mod study_source;

pub use study_source::StudySource;
