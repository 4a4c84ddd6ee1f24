//! The screenshot request pipeline.
//!
//! Per request: resolve parameters, derive the cache key, consult the
//! store, then either serve the cached artifact or render a fresh one and
//! persist it. Exactly one terminal outcome is produced per request.

use std::collections::HashMap;

use pagesnap_core::cache::CacheDecision;
use pagesnap_core::{Error, derive_key, params};

use crate::state::AppState;

/// Run one request through the pipeline, producing PNG bytes or the single
/// terminal error for the request.
pub async fn screenshot(state: &AppState, query: &HashMap<String, String>) -> Result<Vec<u8>, Error> {
    let request = params::resolve(query)?;
    let key = derive_key(&request, state.vary_on_scroll);

    match state.store.lookup(&key, request.ttl_secs, request.force).await? {
        CacheDecision::Hit(path) => {
            tracing::info!(url = %request.url, key = %key, "serving cached screenshot");
            state.store.read(&path).await
        }
        CacheDecision::Miss => {
            tracing::info!(url = %request.url, key = %key, "taking screenshot");
            let bytes = state.renderer.render(&request).await.map_err(Error::from)?;
            state.store.put(&key, &bytes).await?;
            Ok(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pagesnap_core::{ArtifactStore, ScreenshotRequest};
    use pagesnap_render::{RenderError, Renderer};

    const FAKE_PNG: &[u8] = b"\x89PNG fake image bytes";

    struct CountingRenderer {
        calls: AtomicUsize,
        last_url: std::sync::Mutex<Option<String>>,
    }

    impl CountingRenderer {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), last_url: std::sync::Mutex::new(None) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_url(&self) -> Option<String> {
            self.last_url.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Renderer for CountingRenderer {
        async fn render(&self, request: &ScreenshotRequest) -> Result<Vec<u8>, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(request.url.clone());
            Ok(FAKE_PNG.to_vec())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl Renderer for FailingRenderer {
        async fn render(&self, _request: &ScreenshotRequest) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Capture("page crashed".into()))
        }
    }

    fn state_with(root: &Path, renderer: Arc<dyn Renderer>) -> AppState {
        AppState { store: ArtifactStore::new(root), renderer, vary_on_scroll: false }
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn test_miss_renders_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = state_with(dir.path(), renderer.clone());

        let raw = query(&[("url", "example.com"), ("width", "800")]);
        let bytes = screenshot(&state, &raw).await.unwrap();
        assert_eq!(bytes, FAKE_PNG);
        assert_eq!(renderer.calls(), 1);
        assert_eq!(renderer.last_url().as_deref(), Some("https://example.com"));

        // The artifact must land at the derived key path.
        let request = params::resolve(&raw).unwrap();
        let key = derive_key(&request, false);
        assert!(state.store.artifact_path(&key).exists());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = state_with(dir.path(), renderer.clone());

        let raw = query(&[("url", "example.com")]);
        screenshot(&state, &raw).await.unwrap();
        let bytes = screenshot(&state, &raw).await.unwrap();

        assert_eq!(bytes, FAKE_PNG);
        assert_eq!(renderer.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_always_renders() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = state_with(dir.path(), renderer.clone());

        let raw = query(&[("url", "example.com"), ("force", "true")]);
        screenshot(&state, &raw).await.unwrap();
        screenshot(&state, &raw).await.unwrap();

        assert_eq!(renderer.calls(), 2);

        // Both renders overwrite the same artifact path.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_ttl_zero_always_misses() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = state_with(dir.path(), renderer.clone());

        let raw = query(&[("url", "example.com"), ("ttl", "0")]);
        screenshot(&state, &raw).await.unwrap();
        screenshot(&state, &raw).await.unwrap();

        assert_eq!(renderer.calls(), 2);
    }

    #[tokio::test]
    async fn test_validation_failure_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = state_with(dir.path(), renderer.clone());

        let err = screenshot(&state, &query(&[("url", "example.com"), ("width", "abc")]))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("width"));
        assert!(msg.contains("abc"));
        assert_eq!(renderer.calls(), 0);

        let err = screenshot(&state, &query(&[("width", "800")])).await.unwrap_err();
        assert!(err.to_string().contains("missing url parameter"));
        assert_eq!(renderer.calls(), 0);
    }

    #[tokio::test]
    async fn test_render_failure_surfaces_once() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), Arc::new(FailingRenderer));

        let err = screenshot(&state, &query(&[("url", "example.com")])).await.unwrap_err();
        assert!(matches!(err, Error::RenderFailed(_)));

        // Nothing was persisted for the failed render.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn test_scroll_shares_artifact_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = state_with(dir.path(), renderer.clone());

        screenshot(&state, &query(&[("url", "example.com")])).await.unwrap();
        screenshot(&state, &query(&[("url", "example.com"), ("scroll", "true")]))
            .await
            .unwrap();

        // scroll is excluded from the key, so the second request is a hit.
        assert_eq!(renderer.calls(), 1);
    }

    #[tokio::test]
    async fn test_vary_on_scroll_splits_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CountingRenderer::new();
        let state = AppState {
            store: ArtifactStore::new(dir.path()),
            renderer: renderer.clone(),
            vary_on_scroll: true,
        };

        screenshot(&state, &query(&[("url", "example.com")])).await.unwrap();
        screenshot(&state, &query(&[("url", "example.com"), ("scroll", "true")]))
            .await
            .unwrap();

        assert_eq!(renderer.calls(), 2);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }
}
