//! Query parameter resolution for screenshot requests.
//!
//! Raw string-valued query parameters become a typed [`ScreenshotRequest`]
//! or a single terminal error. Resolution is pure; fields are checked in
//! declaration order and the first failure wins.

use std::collections::HashMap;

use crate::error::Error;

/// Default viewport width in pixels.
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default navigation timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default cache TTL in seconds (30 days).
pub const DEFAULT_TTL_SECS: u64 = 2_592_000;

/// A fully validated screenshot request.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotRequest {
    /// Target URL, always carrying a scheme.
    pub url: String,

    /// User-Agent override for the render session.
    pub user_agent: Option<String>,

    /// Wait this long after navigation before capturing.
    pub delay_ms: u64,

    /// Take a fresh screenshot even when a cached one is still fresh.
    pub force: bool,

    /// Capture the full scrollable area instead of the viewport.
    pub full_page: bool,

    /// Viewport width of the browser in pixels.
    pub width: u32,

    /// Maximum milliseconds to wait for page load.
    pub timeout_ms: u64,

    /// Seconds a cached screenshot stays fresh.
    pub ttl_secs: u64,

    /// Scroll to the bottom of the page before capturing, forcing
    /// lazy-loaded assets in.
    pub scroll: bool,
}

/// Resolve raw query parameters into a [`ScreenshotRequest`].
///
/// A parameter that is present but empty counts as absent. A `url` without
/// an `http` scheme prefix is rewritten to `https://{url}` rather than
/// rejected.
pub fn resolve(query: &HashMap<String, String>) -> Result<ScreenshotRequest, Error> {
    let url = match raw_param(query, "url") {
        Some(raw) => normalize_url(raw),
        None => return Err(Error::MissingUrl),
    };

    let user_agent = raw_param(query, "user_agent").map(str::to_string);
    let delay_ms = parse_integer(query, "delay", 0)?;
    let force = parse_flag(query, "force")?;
    let full_page = parse_flag(query, "full_page")?;
    let width = parse_integer(query, "width", DEFAULT_WIDTH)?;
    if width == 0 {
        return Err(invalid_integer(query, "width"));
    }
    let timeout_ms = parse_integer(query, "timeout", DEFAULT_TIMEOUT_MS)?;
    if timeout_ms == 0 {
        return Err(invalid_integer(query, "timeout"));
    }
    let ttl_secs = parse_integer(query, "ttl", DEFAULT_TTL_SECS)?;
    let scroll = parse_flag(query, "scroll")?;

    Ok(ScreenshotRequest {
        url,
        user_agent,
        delay_ms,
        force,
        full_page,
        width,
        timeout_ms,
        ttl_secs,
        scroll,
    })
}

fn raw_param<'a>(query: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    query.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http") { raw.to_string() } else { format!("https://{raw}") }
}

fn parse_integer<T: std::str::FromStr>(
    query: &HashMap<String, String>, name: &str, default: T,
) -> Result<T, Error> {
    match raw_param(query, name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::InvalidInteger { name: name.into(), value: raw.into() }),
    }
}

fn parse_flag(query: &HashMap<String, String>, name: &str) -> Result<bool, Error> {
    match raw_param(query, name) {
        None => Ok(false),
        Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(true),
        Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(false),
        Some(raw) => Err(Error::InvalidBoolean { name: name.into(), value: raw.into() }),
    }
}

fn invalid_integer(query: &HashMap<String, String>, name: &str) -> Error {
    Error::InvalidInteger {
        name: name.into(),
        value: query.get(name).cloned().unwrap_or_default(),
    }
}
