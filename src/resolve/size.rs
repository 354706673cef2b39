//! Target-size computation.
//!
//! The rendered box of a host element jitters by a few pixels across layouts
//! and devices. Requesting thumbnails at the exact measured size would spread
//! near-identical requests over many distinct URLs; quantizing the
//! density-scaled size up to a step multiple keeps the number of URL variants
//! small and the upstream cache hot.

/// Default quantization step in pixels.
pub const DEFAULT_SIZING_STEP: u32 = 100;

/// Default density multiplier for desktop form factors.
pub const DESKTOP_DENSITY: f64 = 1.0;

/// Default density multiplier for mobile form factors.
///
/// Mobile screens are typically smaller but denser; requesting at 2x keeps
/// thumbnails sharp without the caller having to know the exact device ratio.
pub const MOBILE_DENSITY: f64 = 2.0;

// =============================================================================
// Device Class
// =============================================================================

/// Broad device form factor, used only to pick a default density.
///
/// The engine is not in a position to detect the device itself; the embedding
/// platform layer reports the class it knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    /// Desktop or laptop form factor.
    #[default]
    Desktop,

    /// Phone or small tablet form factor.
    Mobile,
}

impl DeviceClass {
    /// Default density multiplier for this device class.
    pub const fn default_density(&self) -> f64 {
        match self {
            DeviceClass::Desktop => DESKTOP_DENSITY,
            DeviceClass::Mobile => MOBILE_DENSITY,
        }
    }
}

// =============================================================================
// Target Size
// =============================================================================

/// Compute the request size for a measured box dimension.
///
/// The measured size is scaled by `density` and rounded up to the next
/// multiple of `step`. A measured size of zero (element not laid out yet)
/// yields zero, which callers treat as "not ready".
///
/// The result is always a non-negative multiple of `step` and is
/// monotonically non-decreasing in `measured`.
pub fn target_size(measured: f64, density: f64, step: u32) -> u32 {
    // A zero step would divide by zero; treat it like an unmeasured box.
    if measured <= 0.0 || step == 0 {
        return 0;
    }

    let scaled = measured * density;
    let steps = (scaled / step as f64).ceil() as u32;
    steps * step
}

// =============================================================================
// Tests
// =============================================================================
