//! Query paths: keyword/filter search, semantic title search, and the
//! skill ranking engine. A request takes exactly one of the first two
//! paths, never both.

pub mod filters;
pub mod semantic;
pub mod skills;
pub mod text;

pub use filters::{JobFilters, Page, search_jobs};
pub use semantic::semantic_search;
pub use skills::search_skills;
