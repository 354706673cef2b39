//! WebP capability probe.
//!
//! Decoding a tiny embedded WebP sample tells us whether the runtime's image
//! stack can handle the format. The probe runs exactly once per process; all
//! callers, including ones issued before the first result is ready, observe
//! the same eventual result. There is no failure path: any decode problem
//! counts as "unsupported".

use image::ImageFormat;
use tokio::sync::OnceCell;
use tracing::debug;

/// A 2x2 lossy WebP image, 66 bytes.
///
/// Successful decode with a pixel height of 2 signals support; any other
/// outcome signals non-support.
const WEBP_SAMPLE: &[u8] = &[
    0x52, 0x49, 0x46, 0x46, 0x3a, 0x00, 0x00, 0x00, // RIFF, payload size 58
    0x57, 0x45, 0x42, 0x50, 0x56, 0x50, 0x38, 0x20, // WEBP, VP8 chunk
    0x2e, 0x00, 0x00, 0x00, 0xb2, 0x02, 0x00, 0x9d,
    0x01, 0x2a, 0x02, 0x00, 0x02, 0x00, 0x2e, 0x69,
    0x34, 0x9a, 0x4d, 0x22, 0x22, 0x22, 0x22, 0x22,
    0x00, 0x68, 0x4b, 0x28, 0x00, 0x05, 0xce, 0x96,
    0x5a, 0x00, 0x00, 0xfe, 0xf7, 0x9f, 0x7f, 0xfd,
    0x0f, 0x3f, 0xc6, 0xc0, 0xff, 0xf2, 0xf0, 0x60,
    0x00, 0x00,
];

/// Pixel height the sample decodes to when the format is supported.
const SUPPORTED_SAMPLE_HEIGHT: u32 = 2;

/// Memoized probe result, shared read-only across all component instances.
static WEBP_SUPPORT: OnceCell<bool> = OnceCell::const_new();

/// Report whether this process can decode WebP.
///
/// The decode attempt happens at most once per process lifetime; repeated
/// calls are free after the first. Safe to call from any number of tasks
/// concurrently.
pub async fn webp_supported() -> bool {
    *WEBP_SUPPORT
        .get_or_init(|| async {
            // Decoding is CPU work; keep it off the async runtime.
            let supported = tokio::task::spawn_blocking(decode_sample)
                .await
                .unwrap_or(false);
            debug!(supported, "webp capability probed");
            supported
        })
        .await
}

/// Attempt to decode the embedded sample.
fn decode_sample() -> bool {
    image::load_from_memory_with_format(WEBP_SAMPLE, ImageFormat::WebP)
        .map(|img| img.height() == SUPPORTED_SAMPLE_HEIGHT)
        .unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================
