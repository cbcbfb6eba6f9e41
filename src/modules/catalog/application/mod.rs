mod study_catalog;

pub use study_catalog::StudyCatalog;
