pub mod bootstrap;

pub use bootstrap::{BootstrapCoordinator, BootstrapFuture, BootstrapPhase};
