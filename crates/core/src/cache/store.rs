//! Filesystem-backed artifact store with read-time freshness decisions.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::cache::key::CacheKey;
use crate::error::Error;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// A fresh artifact exists at this path.
    Hit(PathBuf),

    /// No artifact, a forced refresh, or an expired artifact.
    Miss,
}

/// Flat-directory store of `<key>.png` artifacts.
///
/// Expired artifacts stay on disk; the next miss at the same key simply
/// overwrites them. Two concurrent misses on one key may both write, with
/// the last writer's bytes winning.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the store directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Path the artifact for `key` lives at, whether or not it exists.
    pub fn artifact_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{key}.png"))
    }

    /// Decide between serving the stored artifact and re-rendering.
    ///
    /// A hit requires all three: the artifact exists, `force` is false, and
    /// its age is strictly below `ttl_secs`. Age equal to the TTL is a miss.
    pub async fn lookup(&self, key: &CacheKey, ttl_secs: u64, force: bool) -> Result<CacheDecision, Error> {
        if force {
            return Ok(CacheDecision::Miss);
        }

        let path = self.artifact_path(key);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheDecision::Miss),
            Err(e) => return Err(e.into()),
        };

        let age_secs = artifact_age(&metadata).as_secs();
        if age_secs < ttl_secs {
            tracing::debug!(key = %key, age_secs, ttl_secs, "cache hit");
            Ok(CacheDecision::Hit(path))
        } else {
            tracing::debug!(key = %key, age_secs, ttl_secs, "cached artifact expired");
            Ok(CacheDecision::Miss)
        }
    }

    /// Write an artifact, overwriting any previous bytes at the same key.
    pub async fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<PathBuf, Error> {
        let path = self.artifact_path(key);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Read a stored artifact back.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        Ok(tokio::fs::read(path).await?)
    }
}

/// Artifact age from file metadata.
///
/// Uses the creation time where the filesystem records one, falling back to
/// the modification time elsewhere. A timestamp in the future counts as age
/// zero.
fn artifact_age(metadata: &std::fs::Metadata) -> Duration {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .ok()
        .and_then(|stamp| SystemTime::now().duration_since(stamp).ok())
        .unwrap_or_default()
}
