//! Shared per-process state handed to request handlers.

use std::sync::Arc;

use pagesnap_core::ArtifactStore;
use pagesnap_render::Renderer;

/// Process-wide state: the artifact store and the shared browser handle.
///
/// Created once at startup; every request borrows it through an `Arc`.
pub struct AppState {
    pub store: ArtifactStore,
    pub renderer: Arc<dyn Renderer>,
    pub vary_on_scroll: bool,
}
