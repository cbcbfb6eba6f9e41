//! Wires loading, state, search and filtering into one session object
pub mod application;
pub mod domain;

pub use application::StudyCatalog;
pub use domain::BootstrapOutcome;
