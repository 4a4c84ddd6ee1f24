//! Content-addressed screenshot cache.
//!
//! Artifacts live in a flat directory of `<digest>.png` files. The key is a
//! SHA-256 digest over the request fields that affect rendered output, and
//! freshness is decided at read time from file metadata; nothing is ever
//! evicted.

pub mod key;
pub mod store;

pub use key::{CacheKey, derive_key};
pub use store::{ArtifactStore, CacheDecision};
