use thiserror::Error;

/// Errors that can occur while preloading an image off-screen.
///
/// These never escape the progressive loader: a failed preload leaves the
/// previously displayed URL in place. The type exists so the fetch boundary
/// stays inspectable in logs and tests.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The service answered with a non-success status code.
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    /// The fetched bytes do not look like any known raster image format.
    #[error("unrecognized image data for {url}")]
    UnrecognizedFormat { url: String },
}
