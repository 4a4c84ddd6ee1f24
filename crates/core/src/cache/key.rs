//! Content-addressed cache key derivation.

use sha2::{Digest, Sha256};

use crate::params::ScreenshotRequest;

/// A content-addressed cache key, used directly as the artifact filename stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// The hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the cache key for a screenshot request.
///
/// The digest covers exactly the fields that change the captured image:
/// url, user agent, delay, force, full_page and width. `ttl` never
/// participates. `scroll` participates only when `vary_on_scroll` is set;
/// the default keeps it out, so a scrolled and an unscrolled request for
/// the same page share one artifact.
pub fn derive_key(request: &ScreenshotRequest, vary_on_scroll: bool) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(request.url.as_bytes());
    hasher.update(b"\n");
    hasher.update(request.user_agent.as_deref().unwrap_or("").as_bytes());
    hasher.update(b"\n");
    hasher.update(request.delay_ms.to_string().as_bytes());
    hasher.update(b"\n");
    hasher.update(bool_tag(request.force));
    hasher.update(b"\n");
    hasher.update(bool_tag(request.full_page));
    hasher.update(b"\n");
    hasher.update(request.width.to_string().as_bytes());
    if vary_on_scroll {
        hasher.update(b"\n");
        hasher.update(bool_tag(request.scroll));
    }
    CacheKey(hex::encode(hasher.finalize()))
}

fn bool_tag(value: bool) -> &'static [u8] {
    if value { b"true" } else { b"false" }
}
