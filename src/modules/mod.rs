pub mod catalog;
pub mod filter;
pub mod ingest;
pub mod search;
pub mod state;
pub mod study;
