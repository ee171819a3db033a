pub mod cli;
pub mod config;
pub mod embedding;
pub mod enrich;
pub mod error;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod test_utils;

pub use error::{Result, SearchError};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
