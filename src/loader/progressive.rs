//! Progressive loader state machine.
//!
//! One loader per mounted component instance. A resolution pass moves the
//! instance through `Idle → Resolving → (optional) PlaceholderShown →
//! FullResolutionLoading → Displayed`:
//!
//! - **First resolution** with a configured low-res width: commit a cheap
//!   placeholder URL immediately so something renders, then preload the
//!   full-resolution URL off-screen and commit it once verified.
//! - **First resolution** without a low-res width: preload directly; commit
//!   only after verification, so the host never shows a broken frame.
//! - **Subsequent resolutions** (resize-triggered): always the preload path,
//!   never a placeholder regression.
//!
//! Preload failures are swallowed: the previously displayed image (or
//! nothing, pre-first-load) simply remains. A per-instance generation
//! counter keeps a slow, stale preload from clobbering the result of a
//! newer pass.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::binding::handle::HostElement;
use crate::config::{EngineConfig, ResolverConfig, DEFAULT_LOW_RES_QUALITY};
use crate::loader::cache::PreloadCache;
use crate::loader::fetcher::{verify_image, ImageFetcher};
use crate::resolve::{resolve_url, target_size, ThumbnailOptions};

// =============================================================================
// Parameters
// =============================================================================

/// How the host renders the committed URL.
///
/// Declared by the caller rather than inferred from incidental attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// A plain image element.
    #[default]
    PlainImage,

    /// A container whose background is the image.
    BackgroundContainer,
}

/// Parameters for one mounted thumbnail instance.
///
/// `src` is required; everything else falls back to engine defaults.
/// Explicit `width`/`height` bypass box measurement for that axis.
/// Attributes the engine does not interpret travel in `passthrough` and are
/// forwarded to the host verbatim.
#[derive(Debug, Clone)]
pub struct ThumbnailParams {
    /// Source image URL.
    pub src: String,

    /// Fit strategy understood by the service.
    pub fit: Option<String>,

    /// Crop gravity understood by the service.
    pub gravity: Option<String>,

    /// Density multiplier override; defaults from the device class.
    pub density: Option<f64>,

    /// Explicit request width, bypassing measurement.
    pub width: Option<u32>,

    /// Explicit request height, bypassing measurement.
    pub height: Option<u32>,

    /// Compression quality for the full-resolution request.
    pub quality: Option<u8>,

    /// Sharpen parameter passed through verbatim.
    pub sharpen: Option<String>,

    /// Quantization step override.
    pub sizing_step: Option<u32>,

    /// Width of the low-resolution placeholder; no placeholder when absent.
    pub low_res_width: Option<u32>,

    /// Quality of the low-resolution placeholder (default 30).
    pub low_res_quality: Option<u8>,

    /// How the host renders the committed URL.
    pub render_mode: RenderMode,

    /// Attributes forwarded to the host without interpretation.
    pub passthrough: Vec<(String, String)>,
}

impl ThumbnailParams {
    /// Parameters for `src` with every option at its default.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            fit: None,
            gravity: None,
            density: None,
            width: None,
            height: None,
            quality: None,
            sharpen: None,
            sizing_step: None,
            low_res_width: None,
            low_res_quality: None,
            render_mode: RenderMode::default(),
            passthrough: Vec::new(),
        }
    }
}

// =============================================================================
// Progressive Loader
// =============================================================================

/// Per-instance orchestrator for progressive thumbnail loading.
///
/// Owns the displayed-URL slot for its instance. Thread-safe: resolution
/// passes may be spawned concurrently (mount vs. resize), and commits are
/// serialized internally.
pub struct ProgressiveLoader<F: ImageFetcher> {
    /// Transport for off-screen preloads.
    fetcher: Arc<F>,

    /// URL resolution settings.
    resolver: ResolverConfig,

    /// Sizing and caching settings.
    engine: EngineConfig,

    /// The last committed display URL, if any.
    displayed: Mutex<Option<String>>,

    /// Generation of the most recently initiated pass.
    generation: AtomicU64,

    /// Set on teardown; blocks all further commits.
    shutdown: AtomicBool,

    /// URLs whose preload already verified.
    preloaded: PreloadCache,
}

impl<F: ImageFetcher> ProgressiveLoader<F> {
    /// Create a loader.
    pub fn new(fetcher: Arc<F>, resolver: ResolverConfig, engine: EngineConfig) -> Self {
        let preloaded = PreloadCache::with_capacity(engine.preload_cache_capacity);
        Self {
            fetcher,
            resolver,
            engine,
            displayed: Mutex::new(None),
            generation: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            preloaded,
        }
    }

    /// The last committed display URL.
    pub async fn displayed_url(&self) -> Option<String> {
        self.displayed.lock().await.clone()
    }

    /// Block all further commits. Called on unmount; irreversible.
    pub fn shut_down(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Run one resolution pass against the current measured box.
    ///
    /// `webp` is the already-probed capability flag. If the resolved target
    /// width or height is zero the pass is a no-op and the displayed URL is
    /// left unchanged.
    pub async fn resolve_pass(&self, host: Arc<dyn HostElement>, params: &ThumbnailParams, webp: bool) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let measured = host.measured_box();
        let density = params
            .density
            .unwrap_or_else(|| self.engine.device_class.default_density());
        let step = params.sizing_step.unwrap_or(self.engine.sizing_step);

        let width = params
            .width
            .unwrap_or_else(|| target_size(measured.width, density, step));
        let height = params
            .height
            .unwrap_or_else(|| target_size(measured.height, density, step));

        if width == 0 || height == 0 {
            debug!(src = %params.src, "box not ready, skipping resolution pass");
            return;
        }

        let full_options = ThumbnailOptions {
            fit: params.fit.clone(),
            gravity: params.gravity.clone(),
            width,
            height: Some(height),
            quality: params.quality,
            sharpen: params.sharpen.clone(),
            webp,
        };
        let full_url = resolve_url(&params.src, &full_options, &self.resolver);

        let first_resolution = self.displayed.lock().await.is_none();
        if first_resolution {
            if let Some(low_res_width) = params.low_res_width {
                let low_options = ThumbnailOptions {
                    width: low_res_width,
                    height: None,
                    quality: Some(params.low_res_quality.unwrap_or(DEFAULT_LOW_RES_QUALITY)),
                    ..full_options.clone()
                };
                let low_url = resolve_url(&params.src, &low_options, &self.resolver);

                // The placeholder commits without a preload: rendering
                // something degraded immediately beats rendering nothing.
                debug!(src = %params.src, low_res_width, "committing low-res placeholder");
                self.commit(&host, low_url).await;
            }
        }

        self.preload_and_commit(&host, full_url, generation).await;
    }

    /// Preload `url` off-screen and commit it if still current.
    async fn preload_and_commit(&self, host: &Arc<dyn HostElement>, url: String, generation: u64) {
        // Inline URIs are already local; there is nothing to stream in and
        // no transport that could fetch them.
        let local = url.starts_with("blob:") || url.starts_with("data:");

        if !local && !self.preloaded.contains(&url).await {
            let bytes = match self.fetcher.fetch(&url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!(error = %e, "preload failed, keeping previous image");
                    return;
                }
            };

            if let Err(e) = verify_image(&url, &bytes) {
                debug!(error = %e, "preload verification failed, keeping previous image");
                return;
            }

            self.preloaded.insert(url.clone()).await;
        }

        // Only the most recently initiated pass may commit its result.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(url = %url, "stale preload, discarding");
            return;
        }

        self.commit(host, url).await;
    }

    /// Commit `url` as the displayed URL unless the instance is shut down.
    async fn commit(&self, host: &Arc<dyn HostElement>, url: String) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }

        let mut displayed = self.displayed.lock().await;
        host.commit_url(&url);
        *displayed = Some(url);
    }
}

// =============================================================================
// Tests
// =============================================================================
