//! Thumbnail URL resolution.
//!
//! Maps a source image URL plus sizing/format options to the URL that should
//! actually be fetched: either the source itself (passthrough cases) or a
//! constructed thumbnail-service URL.
//!
//! # Passthrough rules
//!
//! The source URL is returned unchanged, options ignored, when any of these
//! holds (checked in order):
//!
//! 1. The source is empty.
//! 2. The environment is development and the source is not an absolute
//!    `http(s)` URL; local dev assets must not round-trip through a remote
//!    service.
//! 3. The source names an `.svg` file; vector images are not raster-thumbnailed.
//! 4. The source is a `blob:` or `data:` URI; already local, cannot be proxied.
//!
//! Otherwise the source path is percent-encoded onto the service base with
//! the non-empty options as a query string. Identical `(source, options)`
//! inputs always produce identical output, so the transport layer can cache
//! by URL.

use serde::Serialize;
use url::Url;

use crate::config::{Environment, ResolverConfig};

pub mod query;
pub mod size;

pub use size::{target_size, DeviceClass, DEFAULT_SIZING_STEP};

// =============================================================================
// Thumbnail Options
// =============================================================================

/// Options for one thumbnail request.
///
/// Immutable once constructed; exists only for the duration of a single
/// resolution pass. `width` is required and positive by construction: the
/// loader never builds options from an unmeasured box. `height` is omitted
/// for low-resolution placeholder requests, which are bounded by width only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThumbnailOptions {
    /// Fit strategy understood by the service (e.g. "crop", "contain").
    pub fit: Option<String>,

    /// Crop gravity understood by the service (e.g. "center", "face").
    pub gravity: Option<String>,

    /// Requested width in pixels.
    pub width: u32,

    /// Requested height in pixels; unbounded when absent.
    pub height: Option<u32>,

    /// Compression quality, 0-100.
    pub quality: Option<u8>,

    /// Sharpen parameter passed through verbatim.
    pub sharpen: Option<String>,

    /// Whether the negotiated transfer format is WebP.
    pub webp: bool,
}

impl ThumbnailOptions {
    /// Render the options as ordered query pairs.
    ///
    /// The order is fixed so that resolved URLs are referentially
    /// reproducible. Empty values are left in and filtered out by
    /// [`query::serialize`].
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fit", self.fit.clone().unwrap_or_default()),
            ("gravity", self.gravity.clone().unwrap_or_default()),
            ("width", self.width.to_string()),
            (
                "height",
                self.height.map(|h| h.to_string()).unwrap_or_default(),
            ),
            (
                "quality",
                self.quality.map(|q| q.to_string()).unwrap_or_default(),
            ),
            ("sharpen", self.sharpen.clone().unwrap_or_default()),
            ("webp", if self.webp { "true".to_string() } else { String::new() }),
        ]
    }
}

// =============================================================================
// URL Resolution
// =============================================================================

/// Resolve the URL to fetch for a source image and option set.
///
/// Returns the source unchanged for the passthrough cases documented at the
/// module level, otherwise a thumbnail-service URL.
pub fn resolve_url(source_url: &str, options: &ThumbnailOptions, config: &ResolverConfig) -> String {
    if source_url.is_empty() {
        return source_url.to_string();
    }

    if config.environment == Environment::Development && !is_absolute_http(source_url) {
        return source_url.to_string();
    }

    if has_svg_suffix(source_url) {
        return source_url.to_string();
    }

    if source_url.starts_with("blob:") || source_url.starts_with("data:") {
        return source_url.to_string();
    }

    let path = source_url
        .strip_prefix(config.cdn_prefix.as_str())
        .unwrap_or(source_url);
    let path = path.strip_prefix('/').unwrap_or(path);
    let encoded = urlencoding::encode(path);

    let base = config.service_base.trim_end_matches('/');
    let query = query::serialize(&options.query_pairs());

    if query.is_empty() {
        format!("{}/{}", base, encoded)
    } else {
        format!("{}/{}?{}", base, encoded, query)
    }
}

/// Whether the source parses as an absolute `http` or `https` URL.
fn is_absolute_http(source: &str) -> bool {
    match Url::parse(source) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Whether the source names an SVG file, ignoring ASCII case.
fn has_svg_suffix(source: &str) -> bool {
    let len = source.len();
    len >= 4 && source.is_char_boundary(len - 4) && source[len - 4..].eq_ignore_ascii_case(".svg")
}

// =============================================================================
// Tests
// =============================================================================
