//! Headless browser screenshot rendering.
//!
//! This crate provides a renderer trait and an implementation using
//! chromiumoxide for headless Chrome/Chromium control. The browser handle
//! is launched once and shared process-wide; every render obtains its own
//! isolated page, uses it for exactly one navigate-capture cycle, and tears
//! it down again on both success and failure paths.

mod scroll;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use thiserror::Error;

use pagesnap_core::{Error as PipelineError, ScreenshotRequest};

/// Viewport height in pixels, fixed regardless of the requested width.
pub const VIEWPORT_HEIGHT: u32 = 768;

/// Errors that can occur during screenshot rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to the browser.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// The shared browser handle could not supply a page session.
    #[error("browser session unavailable: {0}")]
    SessionUnavailable(String),

    /// Failed to apply viewport or user-agent overrides.
    #[error("emulation setup failed: {0}")]
    Emulation(String),

    /// In-page script evaluation failed.
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// Screenshot capture failed.
    #[error("screenshot capture failed: {0}")]
    Capture(String),
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        let message = err.to_string();
        match err {
            RenderError::Launch(_) | RenderError::SessionUnavailable(_) => {
                PipelineError::RenderUnavailable(message)
            }
            RenderError::Emulation(_) | RenderError::Script(_) | RenderError::Capture(_) => {
                PipelineError::RenderFailed(message)
            }
        }
    }
}

/// Options for launching the shared browser handle.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Browser executable path. Auto-detected when unset.
    pub executable: Option<PathBuf>,
}

/// Renderer trait for producing screenshot bytes from a validated request.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render the requested page to PNG bytes.
    async fn render(&self, request: &ScreenshotRequest) -> Result<Vec<u8>, RenderError>;
}

/// Headless Chrome/Chromium renderer using chromiumoxide.
pub struct HeadlessRenderer {
    browser: Browser,
}

impl HeadlessRenderer {
    /// Launch the shared browser instance.
    ///
    /// The browser runs in headless mode and uses a background task to
    /// handle Chrome DevTools Protocol events. Call this once at startup,
    /// before the HTTP listener accepts traffic.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, RenderError> {
        use futures_util::StreamExt;

        let mut builder = BrowserConfig::builder().arg("--disable-dev-shm-usage");
        if let Some(executable) = &options.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        Ok(Self { browser })
    }
}

#[async_trait]
impl Renderer for HeadlessRenderer {
    async fn render(&self, request: &ScreenshotRequest) -> Result<Vec<u8>, RenderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::SessionUnavailable(e.to_string()))?;

        // The page must be released whatever capture() returns.
        let result = capture(&page, request).await;
        page.close().await.ok();
        result
    }
}

async fn capture(page: &Page, request: &ScreenshotRequest) -> Result<Vec<u8>, RenderError> {
    if let Some(user_agent) = &request.user_agent {
        page.set_user_agent(user_agent.as_str())
            .await
            .map_err(|e| RenderError::Emulation(e.to_string()))?;
    }

    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(request.width))
        .height(i64::from(VIEWPORT_HEIGHT))
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(RenderError::Emulation)?;
    page.execute(metrics)
        .await
        .map_err(|e| RenderError::Emulation(e.to_string()))?;

    // Best-effort navigation: a slow or broken page is logged and still
    // captured in whatever state it reached.
    let navigation = tokio::time::timeout(
        Duration::from_millis(request.timeout_ms),
        page.goto(request.url.as_str()),
    )
    .await;
    match navigation {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            tracing::warn!(url = %request.url, error = %e, "navigation failed, capturing current state");
        }
        Err(_) => {
            tracing::warn!(
                url = %request.url,
                timeout_ms = request.timeout_ms,
                "navigation timed out, capturing current state"
            );
        }
    }

    if request.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(request.delay_ms)).await;
    }

    if request.scroll {
        tracing::debug!(url = %request.url, "auto-scrolling to the bottom of the page");
        scroll::auto_scroll(&scroll::PageSurface::new(page)).await?;
    }

    let shot = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(request.full_page)
        .build();
    page.screenshot(shot)
        .await
        .map_err(|e| RenderError::Capture(e.to_string()))
}
