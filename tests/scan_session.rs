//! Full scan-session integration: capture, classify, compose, overlay,
//! journal, rescan, driven exactly the way a host surface drives the
//! kernel.

use std::time::Instant;

use ecosort_kernel::{
    compute_overlay, place_panel, CaptureGate, CaptureSource, ClassifierResponse,
    ClassifierService, Completion, ScanFailure, ScanHistory, ScanLifecycle, ScanState, StubCamera,
    StubClassifier, Viewport,
};

fn run_one_scan(
    lifecycle: &mut ScanLifecycle,
    camera: &mut StubCamera,
    classifier: &mut StubClassifier,
) -> Completion {
    assert_eq!(lifecycle.begin_capture(), CaptureGate::Accepted);
    let still = camera.capture_still().expect("stub capture");
    let ticket = lifecycle.capture_succeeded().expect("ticket");
    let outcome = classifier.classify(&still.encode());
    lifecycle.finish_classification(ticket, outcome, Instant::now())
}

#[test]
fn scan_then_rescan_then_scan_again() {
    let viewport = Viewport::new(390.0, 844.0);
    let mut camera = StubCamera::new();
    let mut classifier = StubClassifier::with_script(vec![
        Ok(StubClassifier::plastic_bottle()),
        Ok(StubClassifier::styrofoam_tray_fallback()),
    ]);
    let mut lifecycle = ScanLifecycle::new(Instant::now());
    let mut history = ScanHistory::open(":memory:").expect("open history");

    // First scan: anchored overlay, journalled.
    assert_eq!(
        run_one_scan(&mut lifecycle, &mut camera, &mut classifier),
        Completion::Applied
    );
    let insight = lifecycle.insight().expect("insight").clone();
    assert_eq!(insight.material_label, "Plastic packaging");
    assert!(lifecycle.overlay_for(viewport).is_some());
    history.record(&insight).expect("record");

    // Rescan clears overlay state synchronously.
    lifecycle.rescan(Instant::now());
    assert_eq!(*lifecycle.state(), ScanState::Idle);
    assert!(lifecycle.overlay_for(viewport).is_none());

    // Second scan: fallback model, no box, centered panel fallback.
    assert_eq!(
        run_one_scan(&mut lifecycle, &mut camera, &mut classifier),
        Completion::Applied
    );
    let insight = lifecycle.insight().expect("insight").clone();
    assert!(insight.used_fallback_model);
    assert!(insight.bounding_box.is_none());
    assert!(lifecycle.overlay_for(viewport).is_none());
    let panel = place_panel(None, viewport, 280.0);
    assert!(!panel.anchored);
    history.record(&insight).expect("record");

    assert_eq!(history.count().expect("count"), 2);
    let recent = history.recent(10).expect("recent");
    assert_eq!(recent[0].decision, "Special Drop-off");
    assert_eq!(recent[1].decision, "Recycle");

    assert_eq!(classifier.calls(), 2);
    assert_eq!(camera.captures(), 2);
}

#[test]
fn cancelled_request_result_never_lands() {
    let mut camera = StubCamera::new();
    let mut lifecycle = ScanLifecycle::new(Instant::now());

    lifecycle.begin_capture();
    let still = camera.capture_still().expect("stub capture");
    let stale_ticket = lifecycle.capture_succeeded().expect("ticket");

    // The user rescans before the service answers; the host still
    // holds the response when it finally arrives.
    lifecycle.rescan(Instant::now());
    let mut classifier = StubClassifier::new();
    let late_outcome = classifier.classify(&still.encode());
    assert_eq!(
        lifecycle.finish_classification(stale_ticket, late_outcome, Instant::now()),
        Completion::Stale
    );
    assert_eq!(*lifecycle.state(), ScanState::Idle);
}

#[test]
fn service_failure_surfaces_one_alert_and_recovers() {
    let mut camera = StubCamera::new();
    let mut classifier = StubClassifier::with_script(vec![
        Err(ScanFailure::classification("HTTP 503")),
        Ok(StubClassifier::plastic_bottle()),
    ]);
    let mut lifecycle = ScanLifecycle::new(Instant::now());

    assert_eq!(
        run_one_scan(&mut lifecycle, &mut camera, &mut classifier),
        Completion::Applied
    );
    let ScanState::Failed(failure) = lifecycle.state() else {
        panic!("expected failed state, got {:?}", lifecycle.state());
    };
    assert!(failure.alert_text().contains("HTTP 503"));

    // Failed is an entry point: the retry goes straight through.
    assert_eq!(
        run_one_scan(&mut lifecycle, &mut camera, &mut classifier),
        Completion::Applied
    );
    assert!(matches!(lifecycle.state(), ScanState::Result(_)));
}

#[test]
fn malformed_numerics_from_the_service_still_render() {
    let mut camera = StubCamera::new();
    let mut classifier = StubClassifier::with_script(vec![Ok(ClassifierResponse {
        item_type: "mystery sludge".to_string(),
        confidence: -7.5,
        recyclable: false,
        co2_impact: f64::NEG_INFINITY,
        bbox: Some(vec![0.4]),
        fallback_model: true,
        image_path: None,
    })]);
    let mut lifecycle = ScanLifecycle::new(Instant::now());

    run_one_scan(&mut lifecycle, &mut camera, &mut classifier);
    let insight = lifecycle.insight().expect("insight");
    assert_eq!(insight.confidence_percent, 0);
    assert_eq!(insight.co2_impact_label, "Dispose responsibly");
    assert!(insight.bounding_box.is_none());
    assert!(!insight.summary.is_empty());
    assert!(!insight.steps_text.is_empty());
}

#[test]
fn viewport_change_only_moves_geometry() {
    let mut camera = StubCamera::new();
    let mut classifier = StubClassifier::new();
    let mut lifecycle = ScanLifecycle::new(Instant::now());
    run_one_scan(&mut lifecycle, &mut camera, &mut classifier);

    let portrait = lifecycle
        .overlay_for(Viewport::new(390.0, 844.0))
        .expect("portrait overlay");
    let landscape = lifecycle
        .overlay_for(Viewport::new(844.0, 390.0))
        .expect("landscape overlay");
    assert_ne!(portrait, landscape);

    // Same normalized box, recomputed per viewport.
    let bbox = lifecycle.insight().unwrap().bounding_box;
    assert_eq!(
        compute_overlay(bbox, Viewport::new(390.0, 844.0)),
        Some(portrait)
    );
}
