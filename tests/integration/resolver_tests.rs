//! URL resolution integration tests: passthrough rules, determinism,
//! injectivity over option sets.

use std::collections::HashSet;

use thumbflow::{resolve_url, target_size, Environment, ResolverConfig, ThumbnailOptions};

use super::test_utils::{test_resolver_config, SRC};

// =============================================================================
// Service URL Construction
// =============================================================================

#[test]
fn test_imagekit_source_resolves_to_service_url() {
    let options = ThumbnailOptions {
        width: 300,
        height: Some(200),
        webp: true,
        ..ThumbnailOptions::default()
    };
    let resolved = resolve_url(SRC, &options, &test_resolver_config());

    assert_eq!(
        resolved,
        "https://thumbs.example.com/photos%2Fa.jpg?width=300&height=200&webp=true"
    );

    // The encoded source path survives; no empty option leaks a key.
    assert!(resolved.contains("photos%2Fa.jpg"));
    for absent in ["fit=", "gravity=", "quality=", "sharpen="] {
        assert!(!resolved.contains(absent), "unexpected key {}", absent);
    }
}

#[test]
fn test_passthrough_cases_ignore_options() {
    let config = test_resolver_config();
    let dev_config = ResolverConfig {
        environment: Environment::Development,
        ..test_resolver_config()
    };
    let options = ThumbnailOptions {
        width: 300,
        height: Some(200),
        webp: true,
        ..ThumbnailOptions::default()
    };

    // Empty source.
    assert_eq!(resolve_url("", &options, &config), "");

    // Dev-mode relative source.
    assert_eq!(
        resolve_url("/static/hero.jpg", &options, &dev_config),
        "/static/hero.jpg"
    );

    // SVG source.
    assert_eq!(
        resolve_url("https://cdn.example.com/icon.svg", &options, &config),
        "https://cdn.example.com/icon.svg"
    );

    // Inline URIs.
    assert_eq!(
        resolve_url("blob:https://app.example.com/1234", &options, &config),
        "blob:https://app.example.com/1234"
    );
    assert_eq!(
        resolve_url("data:image/gif;base64,R0lGOD", &options, &config),
        "data:image/gif;base64,R0lGOD"
    );
}

#[test]
fn test_resolution_injective_over_option_grid() {
    let config = test_resolver_config();
    let mut seen = HashSet::new();
    let mut total = 0;

    for width in [100u32, 200, 300] {
        for height in [None, Some(100), Some(200)] {
            for webp in [false, true] {
                for quality in [None, Some(30), Some(80)] {
                    let options = ThumbnailOptions {
                        width,
                        height,
                        webp,
                        quality,
                        ..ThumbnailOptions::default()
                    };
                    seen.insert(resolve_url(SRC, &options, &config));
                    total += 1;
                }
            }
        }
    }

    // Every distinct non-empty option set maps to a distinct URL.
    assert_eq!(seen.len(), total);
}

#[test]
fn test_resolution_stable_across_calls() {
    let config = test_resolver_config();
    let options = ThumbnailOptions {
        fit: Some("crop".to_string()),
        gravity: Some("center".to_string()),
        width: 640,
        height: Some(480),
        quality: Some(75),
        sharpen: Some("1".to_string()),
        webp: true,
    };

    let first = resolve_url(SRC, &options, &config);
    for _ in 0..10 {
        assert_eq!(resolve_url(SRC, &options, &config), first);
    }
}

// =============================================================================
// Target Sizing
// =============================================================================

#[test]
fn test_target_size_quantization_scenarios() {
    assert_eq!(target_size(257.0, 1.0, 100), 300);
    assert_eq!(target_size(200.0, 1.0, 100), 200);
    assert_eq!(target_size(0.0, 1.5, 100), 0);
}

#[test]
fn test_target_size_quantization_bounds_url_variants() {
    // Any box between 201 and 300 CSS pixels at density 1 produces the same
    // request width, and therefore the same URL.
    let config = test_resolver_config();
    let mut urls = HashSet::new();

    for measured in 201..=300 {
        let options = ThumbnailOptions {
            width: target_size(measured as f64, 1.0, 100),
            height: Some(100),
            ..ThumbnailOptions::default()
        };
        urls.insert(resolve_url(SRC, &options, &config));
    }

    assert_eq!(urls.len(), 1);
}
