pub mod normalizer;

pub use normalizer::{RawRecord, StudyNormalizer};
