//! Bounded auto-scroll for pages with lazy-loaded content.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;

use crate::RenderError;

/// Hard ceiling on traversed scroll distance, bounding worst-case wait time
/// on infinite-scroll pages.
const SCROLL_CEILING_PX: f64 = 50_000.0;

/// Pause between scroll steps, giving lazy content a beat to load.
const SCROLL_STEP: Duration = Duration::from_millis(100);

/// Seam over the page being scrolled, so the loop's termination behavior is
/// testable without a browser.
#[async_trait]
pub(crate) trait ScrollSurface {
    /// Current vertical scroll offset in pixels.
    async fn offset(&self) -> Result<f64, RenderError>;

    /// Scroll forward by one viewport height.
    async fn advance(&self) -> Result<(), RenderError>;
}

/// Scroll toward the bottom of the page.
///
/// Stops when the offset no longer advances after a step (bottom reached,
/// or lazy content stopped loading) or once the offset reaches the ceiling.
pub(crate) async fn auto_scroll<S: ScrollSurface + ?Sized>(surface: &S) -> Result<(), RenderError> {
    let mut offset = surface.offset().await?;
    while offset < SCROLL_CEILING_PX {
        surface.advance().await?;
        tokio::time::sleep(SCROLL_STEP).await;

        let advanced = surface.offset().await?;
        if advanced == offset {
            break;
        }
        offset = advanced;
    }
    Ok(())
}

/// Scroll surface backed by a live browser page.
pub(crate) struct PageSurface<'a> {
    page: &'a Page,
}

impl<'a> PageSurface<'a> {
    pub(crate) fn new(page: &'a Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl ScrollSurface for PageSurface<'_> {
    async fn offset(&self) -> Result<f64, RenderError> {
        self.page
            .evaluate("window.scrollY")
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?
            .into_value::<f64>()
            .map_err(|e| RenderError::Script(e.to_string()))
    }

    async fn advance(&self) -> Result<(), RenderError> {
        self.page
            .evaluate("window.scrollTo(0, window.scrollY + window.innerHeight)")
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(())
    }
}
