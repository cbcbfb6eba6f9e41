pub mod canonical_category;
pub mod view_mode;

pub use canonical_category::{CanonicalCategory, CategoryAliasTable};
pub use view_mode::ViewMode;
