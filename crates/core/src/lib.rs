//! Core types and shared functionality for pagesnap.
//!
//! This crate provides:
//! - Query parameter resolution into typed screenshot requests
//! - Content-addressed cache keys and the filesystem artifact store
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod params;

pub use cache::{ArtifactStore, CacheDecision, CacheKey, derive_key};
pub use config::AppConfig;
pub use error::Error;
pub use params::ScreenshotRequest;
