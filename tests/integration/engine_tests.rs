//! End-to-end engine tests: mount, progressive load, resize, teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;

use thumbflow::{
    ElementObserver, HostElement, ResponsiveBinding, ThumbnailParams, ViewportSize,
};

use super::test_utils::{
    test_engine_config, test_resolver_config, RecordingHost, TrackingFetcher, SRC,
};

fn mounted_binding(
    params: ThumbnailParams,
    host: Arc<RecordingHost>,
    debounce_ms: u64,
) -> (
    ResponsiveBinding<TrackingFetcher>,
    Arc<TrackingFetcher>,
    broadcast::Sender<ViewportSize>,
) {
    let fetcher = Arc::new(TrackingFetcher::new());
    let mut binding = ResponsiveBinding::new(
        fetcher.clone(),
        test_resolver_config(),
        test_engine_config(debounce_ms),
        params,
    );

    let (tx, rx) = broadcast::channel(32);
    binding.mount(host, rx);
    (binding, fetcher, tx)
}

// =============================================================================
// Progressive Loading
// =============================================================================

#[tokio::test]
async fn test_two_phase_load_low_res_then_full() {
    let mut params = ThumbnailParams::new(SRC);
    params.low_res_width = Some(20);

    let host = Arc::new(RecordingHost::new(400.0, 300.0));
    let (_binding, fetcher, _tx) = mounted_binding(params, host.clone(), 50);

    sleep(Duration::from_millis(150)).await;

    let committed = host.committed();
    assert_eq!(committed.len(), 2, "expected placeholder then full commit");

    // Phase one: low-res placeholder, width-bound only, low quality.
    assert!(committed[0].contains("width=20"));
    assert!(committed[0].contains("quality=30"));
    assert!(!committed[0].contains("height="));

    // Phase two: full resolution at the quantized box size.
    assert!(committed[1].contains("width=400"));
    assert!(committed[1].contains("height=300"));

    // Only the full-resolution image was preloaded.
    assert_eq!(fetcher.request_count(), 1);
    assert_eq!(fetcher.requests(), vec![committed[1].clone()]);
}

#[tokio::test]
async fn test_single_phase_load_without_low_res() {
    let host = Arc::new(RecordingHost::new(400.0, 300.0));
    let mut params = ThumbnailParams::new(SRC);
    params.passthrough = vec![("alt".to_string(), "Pool view".to_string())];
    let (_binding, fetcher, _tx) = mounted_binding(params, host.clone(), 50);

    sleep(Duration::from_millis(150)).await;

    let committed = host.committed();
    assert_eq!(committed.len(), 1, "no placeholder phase was configured");
    assert!(committed[0].contains("width=400"));
    assert_eq!(fetcher.request_count(), 1);

    // Uninterpreted attributes reached the host untouched.
    assert_eq!(
        host.attributes(),
        vec![("alt".to_string(), "Pool view".to_string())]
    );
}

#[tokio::test]
async fn test_full_preload_failure_leaves_placeholder() {
    let mut params = ThumbnailParams::new(SRC);
    params.low_res_width = Some(20);

    let host = Arc::new(RecordingHost::new(400.0, 300.0));
    let fetcher = Arc::new(TrackingFetcher::new());
    fetcher.fail_all();

    let mut binding = ResponsiveBinding::new(
        fetcher.clone(),
        test_resolver_config(),
        test_engine_config(50),
        params,
    );
    let (_tx, rx) = broadcast::channel::<ViewportSize>(8);
    binding.mount(host.clone(), rx);

    sleep(Duration::from_millis(150)).await;

    // The placeholder committed synchronously; the failed full-resolution
    // preload degraded silently and left it in place.
    let committed = host.committed();
    assert_eq!(committed.len(), 1);
    assert!(committed[0].contains("width=20"));
    assert_eq!(binding.displayed_url().await, Some(committed[0].clone()));
}

#[tokio::test]
async fn test_unmeasured_box_defers_without_commit() {
    let host = Arc::new(RecordingHost::new(0.0, 0.0));
    let (binding, fetcher, _tx) = mounted_binding(ThumbnailParams::new(SRC), host.clone(), 50);

    sleep(Duration::from_millis(100)).await;

    assert!(host.committed().is_empty());
    assert_eq!(fetcher.request_count(), 0);
    assert_eq!(binding.displayed_url().await, None);
}

#[tokio::test]
async fn test_svg_source_displays_unproxied() {
    let svg_src = "https://cdn.example.com/marker.svg";
    let host = Arc::new(RecordingHost::new(200.0, 200.0));

    let fetcher = Arc::new(TrackingFetcher::new());
    fetcher.set_body(svg_src, b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec());

    let mut binding = ResponsiveBinding::new(
        fetcher.clone(),
        test_resolver_config(),
        test_engine_config(50),
        ThumbnailParams::new(svg_src),
    );
    let (_tx, rx) = broadcast::channel::<ViewportSize>(8);
    binding.mount(host.clone(), rx);

    sleep(Duration::from_millis(150)).await;

    // Vector sources bypass the service entirely but still preload.
    assert_eq!(host.committed(), vec![svg_src.to_string()]);
    assert_eq!(fetcher.requests(), vec![svg_src.to_string()]);
}

// =============================================================================
// Resize Behavior
// =============================================================================

#[tokio::test]
async fn test_resize_burst_triggers_single_reresolution() {
    let host = Arc::new(RecordingHost::new(300.0, 200.0));
    let (_binding, fetcher, tx) = mounted_binding(ThumbnailParams::new(SRC), host.clone(), 50);

    sleep(Duration::from_millis(120)).await;
    assert_eq!(host.committed().len(), 1);

    // The box grows, then five resize events land inside the window.
    host.set_box(520.0, 410.0);
    for i in 0..5 {
        tx.send(ViewportSize {
            width: 1200.0 + i as f64,
            height: 800.0,
        })
        .unwrap();
        sleep(Duration::from_millis(8)).await;
    }

    sleep(Duration::from_millis(250)).await;

    // Exactly one re-resolution, at the freshly quantized size.
    let committed = host.committed();
    assert_eq!(committed.len(), 2);
    assert!(committed[1].contains("width=600"));
    assert!(committed[1].contains("height=500"));
    assert_eq!(fetcher.request_count(), 2);
}

#[tokio::test]
async fn test_resize_to_same_quantized_size_recommits_cached_url() {
    let host = Arc::new(RecordingHost::new(300.0, 200.0));
    let (_binding, fetcher, tx) = mounted_binding(ThumbnailParams::new(SRC), host.clone(), 40);

    sleep(Duration::from_millis(120)).await;
    assert_eq!(fetcher.request_count(), 1);

    // A small jitter that quantizes to the same size resolves to the same
    // URL; the verified-preload cache answers without another fetch.
    host.set_box(295.0, 198.0);
    tx.send(ViewportSize {
        width: 1190.0,
        height: 790.0,
    })
    .unwrap();

    sleep(Duration::from_millis(200)).await;

    assert_eq!(fetcher.request_count(), 1);
    let committed = host.committed();
    assert_eq!(committed.len(), 2);
    assert_eq!(committed[0], committed[1]);
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn test_unmount_mid_flight_no_observable_mutation() {
    let host = Arc::new(RecordingHost::new(400.0, 300.0));
    let fetcher = Arc::new(TrackingFetcher::new());

    // Park every preload until released.
    let full_url = {
        let options = thumbflow::ThumbnailOptions {
            width: 400,
            height: Some(300),
            webp: thumbflow::webp_supported().await,
            ..thumbflow::ThumbnailOptions::default()
        };
        thumbflow::resolve_url(SRC, &options, &test_resolver_config())
    };
    let gate = fetcher.gate(&full_url);

    let mut binding = ResponsiveBinding::new(
        fetcher.clone(),
        test_resolver_config(),
        test_engine_config(50),
        ThumbnailParams::new(SRC),
    );
    let (_tx, rx) = broadcast::channel::<ViewportSize>(8);
    binding.mount(host.clone(), rx);

    sleep(Duration::from_millis(80)).await;
    assert_eq!(fetcher.request_count(), 1, "preload should be in flight");

    binding.unmount();
    gate.notify_waiters();

    sleep(Duration::from_millis(80)).await;
    assert!(host.committed().is_empty());
    assert_eq!(binding.displayed_url().await, None);
}

#[tokio::test]
async fn test_drop_tears_down_like_unmount() {
    let host = Arc::new(RecordingHost::new(300.0, 200.0));
    let (binding, _fetcher, tx) = mounted_binding(ThumbnailParams::new(SRC), host.clone(), 30);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(host.committed().len(), 1);

    drop(binding);

    let _ = tx.send(ViewportSize {
        width: 2000.0,
        height: 1000.0,
    });
    sleep(Duration::from_millis(120)).await;

    assert_eq!(host.committed().len(), 1);
}

// =============================================================================
// Dual Observation
// =============================================================================

#[tokio::test]
async fn test_caller_observer_shares_the_engine_element() {
    struct CapturingObserver {
        element: Mutex<Option<Arc<dyn HostElement>>>,
    }

    impl ElementObserver for CapturingObserver {
        fn attached(&self, element: &Arc<dyn HostElement>) {
            *self.element.lock().unwrap() = Some(element.clone());
        }
        fn detached(&self) {
            *self.element.lock().unwrap() = None;
        }
    }

    let observer = Arc::new(CapturingObserver {
        element: Mutex::new(None),
    });

    let fetcher = Arc::new(TrackingFetcher::new());
    let mut binding = ResponsiveBinding::with_external_observer(
        fetcher,
        test_resolver_config(),
        test_engine_config(30),
        ThumbnailParams::new(SRC),
        observer.clone(),
    );

    let host = Arc::new(RecordingHost::new(640.0, 480.0));
    let host_dyn: Arc<dyn HostElement> = host.clone();
    let (_tx, rx) = broadcast::channel::<ViewportSize>(8);
    binding.mount(host_dyn.clone(), rx);

    // The caller's observer holds the identical underlying element.
    {
        let seen = observer.element.lock().unwrap();
        let seen = seen.as_ref().expect("observer saw the element");
        assert!(Arc::ptr_eq(seen, &host_dyn));
    }

    binding.unmount();
    assert!(observer.element.lock().unwrap().is_none());
}
