//! Configuration for the thumbnail engine and its CLI.
//!
//! Two configuration surfaces live here:
//!
//! - [`ResolverConfig`] / [`EngineConfig`]: the library-level settings an
//!   embedding application constructs directly.
//! - [`Cli`] / [`Command`]: the clap-based command line for the `thumbflow`
//!   binary, which resolves URLs offline and probes decoder capability.
//!
//! # Environment Variables
//!
//! CLI options can also be set via environment variables with the
//! `THUMBFLOW_` prefix:
//!
//! - `THUMBFLOW_SERVICE_BASE` - Thumbnail service base URL
//! - `THUMBFLOW_CDN_PREFIX` - CDN prefix stripped from source URLs

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::loader::DEFAULT_PRELOAD_CACHE_CAPACITY;
use crate::resolve::{DeviceClass, ThumbnailOptions, DEFAULT_SIZING_STEP};

// =============================================================================
// Default Values
// =============================================================================

/// Default thumbnail service base URL.
pub const DEFAULT_SERVICE_BASE: &str = "https://thumbs.avantstay.com/";

/// Default CDN prefix stripped from source URLs before encoding.
pub const DEFAULT_CDN_PREFIX: &str = "https://ik.imagekit.io/avantstay/";

/// Default quality for low-resolution placeholder requests.
pub const DEFAULT_LOW_RES_QUALITY: u8 = 30;

/// Default quiescence window for resize debouncing.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment the engine runs in.
///
/// In development, relative and non-`http(s)` sources are never proxied
/// through the remote service; they resolve to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production deployment; all eligible sources are proxied.
    #[default]
    Production,

    /// Local development; only absolute `http(s)` sources are proxied.
    Development,
}

// =============================================================================
// Resolver Configuration
// =============================================================================

/// Settings for URL resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base URL of the thumbnail service.
    pub service_base: String,

    /// CDN prefix stripped from source URLs so the service receives a
    /// bucket-relative path.
    pub cdn_prefix: String,

    /// Deployment environment.
    pub environment: Environment,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            service_base: DEFAULT_SERVICE_BASE.to_string(),
            cdn_prefix: DEFAULT_CDN_PREFIX.to_string(),
            environment: Environment::Production,
        }
    }
}

impl ResolverConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.service_base.is_empty() {
            return Err("service_base is required".to_string());
        }

        if !self.service_base.starts_with("http://") && !self.service_base.starts_with("https://") {
            return Err(format!(
                "service_base must be an absolute http(s) URL, got '{}'",
                self.service_base
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Settings for sizing, debouncing, and preload caching.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Device form factor, used for the default density multiplier.
    pub device_class: DeviceClass,

    /// Quantization step for computed target sizes, in pixels.
    pub sizing_step: u32,

    /// Quiescence window for resize debouncing.
    pub debounce_window: Duration,

    /// Capacity of the verified-preload LRU cache, in URLs.
    pub preload_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            device_class: DeviceClass::Desktop,
            sizing_step: DEFAULT_SIZING_STEP,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            preload_cache_capacity: DEFAULT_PRELOAD_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.sizing_step == 0 {
            return Err("sizing_step must be greater than 0".to_string());
        }

        if self.preload_cache_capacity == 0 {
            return Err("preload_cache_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// thumbflow - Responsive thumbnail URL resolution.
///
/// Resolves thumbnail-service URLs for source images offline and probes
/// the local runtime's decoder capabilities.
#[derive(Parser, Debug)]
#[command(name = "thumbflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the thumbnail-service URL for a source image.
    Resolve(ResolveArgs),

    /// Probe whether this runtime can decode WebP.
    Probe(ProbeArgs),
}

/// Output format for the resolve command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutputFormat {
    /// Print the resolved URL only.
    Url,

    /// Print a JSON object with the source, options, and resolved URL.
    Json,
}

/// Arguments for the resolve command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Source image URL.
    pub src: String,

    /// Thumbnail service base URL.
    #[arg(long, default_value = DEFAULT_SERVICE_BASE, env = "THUMBFLOW_SERVICE_BASE")]
    pub service_base: String,

    /// CDN prefix stripped from source URLs before encoding.
    #[arg(long, default_value = DEFAULT_CDN_PREFIX, env = "THUMBFLOW_CDN_PREFIX")]
    pub cdn_prefix: String,

    /// Treat the environment as development (relative sources pass through).
    #[arg(long, default_value_t = false)]
    pub dev: bool,

    /// Fit strategy understood by the service (e.g. crop, contain).
    #[arg(long)]
    pub fit: Option<String>,

    /// Crop gravity understood by the service (e.g. center).
    #[arg(long)]
    pub gravity: Option<String>,

    /// Requested width in pixels.
    #[arg(long)]
    pub width: u32,

    /// Requested height in pixels (unbounded if omitted).
    #[arg(long)]
    pub height: Option<u32>,

    /// Compression quality (0-100).
    #[arg(long)]
    pub quality: Option<u8>,

    /// Sharpen parameter passed through verbatim.
    #[arg(long)]
    pub sharpen: Option<String>,

    /// Request WebP without probing decoder support.
    #[arg(long, default_value_t = false)]
    pub webp: bool,

    /// Probe the local decoder and negotiate the format from the result.
    #[arg(long, default_value_t = false)]
    pub negotiate: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "url")]
    pub format: ResolveOutputFormat,
}

impl ResolveArgs {
    /// Validate the arguments and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 {
            return Err("width must be greater than 0".to_string());
        }

        if self.height == Some(0) {
            return Err("height must be greater than 0".to_string());
        }

        if let Some(quality) = self.quality {
            if quality > 100 {
                return Err("quality must be between 0 and 100".to_string());
            }
        }

        let config = self.resolver_config();
        config.validate()
    }

    /// Build the resolver configuration from these arguments.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            service_base: self.service_base.clone(),
            cdn_prefix: self.cdn_prefix.clone(),
            environment: if self.dev {
                Environment::Development
            } else {
                Environment::Production
            },
        }
    }

    /// Build the thumbnail options with the negotiated format flag.
    pub fn options(&self, webp: bool) -> ThumbnailOptions {
        ThumbnailOptions {
            fit: self.fit.clone(),
            gravity: self.gravity.clone(),
            width: self.width,
            height: self.height,
            quality: self.quality,
            sharpen: self.sharpen.clone(),
            webp,
        }
    }
}

/// Arguments for the probe command.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Emit the result as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

// =============================================================================
// Tests
// =============================================================================
