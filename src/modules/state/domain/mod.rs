//! Events published by the state store to view-layer subscribers
mod store_events;

pub use store_events::*;
