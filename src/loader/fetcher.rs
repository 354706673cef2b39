//! Off-screen image fetching.
//!
//! The preload mechanism is abstracted behind [`ImageFetcher`] so the loader
//! can be exercised without a network, and so embedders can route fetches
//! through their own transport (an in-process cache, a test double, a
//! platform image pipeline).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::LoadError;

/// Trait for fetching the bytes behind a resolved image URL.
///
/// Implementations must be thread-safe; one fetcher is shared by every
/// in-flight preload of a component instance.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes behind `url`.
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn fetch(&self, url: &str) -> Result<Bytes, LoadError>;
}

/// Verify that fetched bytes begin like a displayable image.
///
/// This is the off-screen "did it actually load" check: a body of HTML from
/// a misconfigured service, or a truncated error page, must never be
/// committed for display. The service only ever returns rasters, but
/// passthrough sources may be SVG, which has no magic bytes the raster
/// sniffer knows, so those are recognized by their document prelude.
pub fn verify_image(url: &str, bytes: &[u8]) -> Result<(), LoadError> {
    if image::guess_format(bytes).is_ok() || looks_like_svg(bytes) {
        return Ok(());
    }

    Err(LoadError::UnrecognizedFormat {
        url: url.to_string(),
    })
}

/// Whether the bytes open like an SVG document.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let trimmed = text.trim_start();
    trimmed.starts_with("<svg") || trimmed.starts_with("<?xml")
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// Default [`ImageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Create a fetcher with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a fetcher around an existing client (shared pools, custom
    /// timeouts, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.bytes().await.map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
