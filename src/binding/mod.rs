//! Responsive binding: mount, resize subscription, teardown.
//!
//! The binding glues the engine to a host element. On mount it waits for the
//! format capability probe, then runs one resolution pass with the
//! then-current measured box. Viewport resize events are debounced through a
//! 200 ms quiescence window; each fired pass re-awaits the (memoized) probe
//! and re-measures the box fresh. Teardown removes the resize subscription,
//! disarms pending debounce timers, and blocks any in-flight preload from
//! committing. No observable mutation can land after unmount.

pub mod debounce;
pub mod handle;

pub use debounce::Debouncer;
pub use handle::{CompositeHandle, ElementObserver, HostElement, MeasuredBox};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::{EngineConfig, ResolverConfig};
use crate::format::webp_supported;
use crate::loader::{ImageFetcher, ProgressiveLoader, ThumbnailParams};

// =============================================================================
// Viewport Events
// =============================================================================

/// Viewport dimensions delivered with each resize event.
///
/// The binding does not use the payload (the host box is re-measured fresh
/// when the debounced pass fires), but carrying it keeps the channel useful
/// to other subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    /// Viewport width in CSS pixels.
    pub width: f64,

    /// Viewport height in CSS pixels.
    pub height: f64,
}

// =============================================================================
// Responsive Binding
// =============================================================================

/// Binds one thumbnail instance to a host element and the viewport.
///
/// Owns the instance's [`ProgressiveLoader`] and its resize subscription.
/// Dropping the binding tears everything down.
pub struct ResponsiveBinding<F: ImageFetcher + 'static> {
    loader: Arc<ProgressiveLoader<F>>,
    handle: Arc<CompositeHandle>,
    params: Arc<ThumbnailParams>,
    debounce_window: Duration,
    resize_task: Option<JoinHandle<()>>,
}

impl<F: ImageFetcher + 'static> ResponsiveBinding<F> {
    /// Create a binding with no external element observer.
    pub fn new(
        fetcher: Arc<F>,
        resolver: ResolverConfig,
        engine: EngineConfig,
        params: ThumbnailParams,
    ) -> Self {
        Self::with_handle(
            fetcher,
            resolver,
            engine,
            params,
            Arc::new(CompositeHandle::new()),
        )
    }

    /// Create a binding whose element handle also notifies `observer`.
    ///
    /// The observer sees the identical element `Arc` the engine measures, so
    /// the caller can hold its own reference without the engine's
    /// bookkeeping interfering.
    pub fn with_external_observer(
        fetcher: Arc<F>,
        resolver: ResolverConfig,
        engine: EngineConfig,
        params: ThumbnailParams,
        observer: Arc<dyn ElementObserver>,
    ) -> Self {
        Self::with_handle(
            fetcher,
            resolver,
            engine,
            params,
            Arc::new(CompositeHandle::with_external(observer)),
        )
    }

    fn with_handle(
        fetcher: Arc<F>,
        resolver: ResolverConfig,
        engine: EngineConfig,
        params: ThumbnailParams,
        handle: Arc<CompositeHandle>,
    ) -> Self {
        let debounce_window = engine.debounce_window;
        let loader = Arc::new(ProgressiveLoader::new(fetcher, resolver, engine));
        Self {
            loader,
            handle,
            params: Arc::new(params),
            debounce_window,
            resize_task: None,
        }
    }

    /// The element handle, for callers that attach the element themselves.
    pub fn handle(&self) -> Arc<CompositeHandle> {
        self.handle.clone()
    }

    /// The last committed display URL.
    pub async fn displayed_url(&self) -> Option<String> {
        self.loader.displayed_url().await
    }

    /// Bind to `element`, run the initial resolution pass, and subscribe to
    /// viewport resize events.
    pub fn mount(
        &mut self,
        element: Arc<dyn HostElement>,
        resize_events: broadcast::Receiver<ViewportSize>,
    ) {
        self.handle.attach(element.clone());
        element.apply_attributes(&self.params.passthrough);

        // Initial pass: wait for the capability probe, then resolve with the
        // box as measured at that moment.
        let loader = self.loader.clone();
        let params = self.params.clone();
        tokio::spawn(async move {
            let webp = webp_supported().await;
            loader.resolve_pass(element, &params, webp).await;
        });

        // Resize passes go through the debouncer. The fired pass re-awaits
        // the probe (free after the first resolution) and re-measures
        // through the handle, not through a captured box.
        let loader = self.loader.clone();
        let params = self.params.clone();
        let handle = self.handle.clone();
        let debouncer = Debouncer::new(self.debounce_window, move || {
            let loader = loader.clone();
            let params = params.clone();
            let handle = handle.clone();
            async move {
                let Some(host) = handle.element() else {
                    return;
                };
                let webp = webp_supported().await;
                loader.resolve_pass(host, &params, webp).await;
            }
        });

        let mut events = resize_events;
        self.resize_task = Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) => debouncer.call(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Coalescing is what the debouncer does anyway.
                        debug!(skipped, "resize events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            // The debouncer drops here, disarming any pending timer.
        }));
    }

    /// Tear down: stop listening for resizes, disarm pending debounce
    /// timers, block further commits, and release the element.
    pub fn unmount(&mut self) {
        if let Some(task) = self.resize_task.take() {
            task.abort();
        }
        self.loader.shut_down();
        self.handle.detach();
    }
}

impl<F: ImageFetcher + 'static> Drop for ResponsiveBinding<F> {
    fn drop(&mut self) {
        // Same sequence as unmount; detach is a no-op if already detached.
        if let Some(task) = self.resize_task.take() {
            task.abort();
        }
        self.loader.shut_down();
        self.handle.detach();
    }
}

// =============================================================================
// Tests
// =============================================================================
