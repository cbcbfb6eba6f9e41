pub mod search_index;

pub use search_index::{BuildFuture, IndexStatus, SearchIndex};
