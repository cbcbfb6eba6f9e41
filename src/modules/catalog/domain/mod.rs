mod bootstrap_outcome;

pub use bootstrap_outcome::BootstrapOutcome;
