pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{BootstrapCoordinator, BootstrapFuture, BootstrapPhase};
pub use domain::StudySource;
pub use infrastructure::{parse_studies_csv, FileStudySource, HttpStudySource};
