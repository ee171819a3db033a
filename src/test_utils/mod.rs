//! Test helpers: deterministic embedding stubs and record fixtures.
//!
//! Compiled into the library so integration tests and downstream crates can
//! exercise search paths without a live embedding service.

pub mod fixtures;
pub mod stub;

pub use stub::{FailingEmbedder, StubEmbedder};
