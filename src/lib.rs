//! # thumbflow
//!
//! Responsive thumbnail resolution and progressive image loading against a
//! remote thumbnailing service.
//!
//! Given a source image URL and a handle to a host element, thumbflow
//! decides whether the source should be proxied through the thumbnail
//! service at all, computes request dimensions from the rendered box, the
//! device pixel density, and a quantization step, negotiates the transfer
//! format against the runtime's decoder capabilities, and orchestrates a
//! two-phase (low-res placeholder → full resolution) or single-phase load
//! so the host never displays a broken or partially fetched frame. Viewport
//! resizes re-trigger resolution through a debouncer.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`resolve`] - URL resolution, query serialization, and target sizing
//! - [`mod@format`] - One-shot WebP decode capability probe
//! - [`loader`] - Progressive loader, image fetching, preload cache
//! - [`binding`] - Host element handle, resize debouncing, mount/teardown
//! - [`config`] - Library configuration and CLI types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thumbflow::{
//!     EngineConfig, HttpImageFetcher, ResolverConfig, ResponsiveBinding, ThumbnailParams,
//! };
//!
//! # fn attach(_: &thumbflow::ResponsiveBinding<HttpImageFetcher>) {}
//! #[tokio::main]
//! async fn main() {
//!     let fetcher = Arc::new(HttpImageFetcher::new());
//!
//!     let mut params = ThumbnailParams::new("https://ik.imagekit.io/avantstay/photos/a.jpg");
//!     params.low_res_width = Some(20);
//!
//!     let binding = ResponsiveBinding::new(
//!         fetcher,
//!         ResolverConfig::default(),
//!         EngineConfig::default(),
//!         params,
//!     );
//!
//!     // Attach a platform-specific HostElement and a resize channel,
//!     // then mount...
//!     attach(&binding);
//! }
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod resolve;

// Re-export commonly used types
pub use binding::{
    CompositeHandle, Debouncer, ElementObserver, HostElement, MeasuredBox, ResponsiveBinding,
    ViewportSize,
};
pub use config::{
    Cli, Command, EngineConfig, Environment, ProbeArgs, ResolveArgs, ResolveOutputFormat,
    ResolverConfig, DEFAULT_CDN_PREFIX, DEFAULT_DEBOUNCE_WINDOW, DEFAULT_LOW_RES_QUALITY,
    DEFAULT_SERVICE_BASE,
};
pub use error::LoadError;
pub use format::webp_supported;
pub use loader::{
    verify_image, HttpImageFetcher, ImageFetcher, PreloadCache, ProgressiveLoader, RenderMode,
    ThumbnailParams, DEFAULT_PRELOAD_CACHE_CAPACITY,
};
pub use resolve::{resolve_url, target_size, DeviceClass, ThumbnailOptions, DEFAULT_SIZING_STEP};
