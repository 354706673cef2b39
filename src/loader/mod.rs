//! Progressive thumbnail loading.
//!
//! The loader owns the displayed-URL slot for one mounted component
//! instance. It decides low-res/full-res sequencing, preloads candidate
//! images off-screen through an [`ImageFetcher`], and commits a URL to the
//! host only once its backing image is known good, so the visible element
//! never transitions to a broken or partially fetched frame.

pub mod cache;
pub mod fetcher;
pub mod progressive;

pub use cache::{PreloadCache, DEFAULT_PRELOAD_CACHE_CAPACITY};
pub use fetcher::{verify_image, HttpImageFetcher, ImageFetcher};
pub use progressive::{ProgressiveLoader, RenderMode, ThumbnailParams};
