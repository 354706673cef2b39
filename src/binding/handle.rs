//! Host element handle and the dual-observer composite.
//!
//! The engine does not render anything itself. It talks to the host element
//! through [`HostElement`]: measure the rendered box, commit a resolved URL,
//! forward attributes it does not interpret. The embedding caller may want
//! its own reference to the same element; [`CompositeHandle`] multiplexes
//! attach/detach over the engine's internal binding and an optional external
//! observer so both always see the identical underlying element.

use std::sync::{Arc, RwLock};

// =============================================================================
// Measured Box
// =============================================================================

/// Rendered box dimensions read from the host element.
///
/// Read fresh at the moment of each resolution pass; never cached across
/// passes, because the box may have changed. Zero dimensions mean the
/// element has not been laid out yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasuredBox {
    /// Rendered width in CSS pixels.
    pub width: f64,

    /// Rendered height in CSS pixels.
    pub height: f64,
}

impl MeasuredBox {
    /// Create a measured box.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Host Element
// =============================================================================

/// Handle to the element whose image region the engine resolves.
///
/// Implementations must be thread-safe; the engine calls them from spawned
/// preload tasks as well as from the mount path.
pub trait HostElement: Send + Sync {
    /// Current rendered box. Zero dimensions are a valid "not ready" state.
    fn measured_box(&self) -> MeasuredBox;

    /// Accept the resolved URL for display.
    fn commit_url(&self, url: &str);

    /// Receive attributes the engine passes through opaquely.
    fn apply_attributes(&self, attributes: &[(String, String)]);
}

/// Observer of element attach/detach, for callers that hold their own
/// reference into the bound element.
pub trait ElementObserver: Send + Sync {
    /// The handle was bound to `element`.
    fn attached(&self, element: &Arc<dyn HostElement>);

    /// The handle was unbound.
    fn detached(&self);
}

// =============================================================================
// Composite Handle
// =============================================================================

/// Element handle that forwards attach/detach to an optional external
/// observer alongside its own binding.
///
/// The engine measures through this handle; the caller's observer sees the
/// same `Arc`, so both observe one underlying element and neither interferes
/// with the other's reference semantics.
pub struct CompositeHandle {
    element: RwLock<Option<Arc<dyn HostElement>>>,
    external: Option<Arc<dyn ElementObserver>>,
}

impl CompositeHandle {
    /// Create a handle with no external observer.
    pub fn new() -> Self {
        Self {
            element: RwLock::new(None),
            external: None,
        }
    }

    /// Create a handle that also notifies `observer` on attach/detach.
    pub fn with_external(observer: Arc<dyn ElementObserver>) -> Self {
        Self {
            element: RwLock::new(None),
            external: Some(observer),
        }
    }

    /// Bind the handle to `element` and notify the external observer.
    pub fn attach(&self, element: Arc<dyn HostElement>) {
        {
            let mut slot = self.element.write().unwrap();
            *slot = Some(element.clone());
        }
        if let Some(ref external) = self.external {
            external.attached(&element);
        }
    }

    /// Unbind the handle and notify the external observer.
    ///
    /// A no-op when nothing is bound, so teardown paths may call it
    /// unconditionally without double-notifying the observer.
    pub fn detach(&self) {
        let was_bound = {
            let mut slot = self.element.write().unwrap();
            slot.take().is_some()
        };
        if was_bound {
            if let Some(ref external) = self.external {
                external.detached();
            }
        }
    }

    /// The currently bound element, if any.
    pub fn element(&self) -> Option<Arc<dyn HostElement>> {
        self.element.read().unwrap().clone()
    }
}

impl Default for CompositeHandle {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
