mod common;

use cascade_detector::cascade::{load_cascade, Normalization};
use cascade_detector::error::{ConfigError, DetectError, InputError};
use cascade_detector::image::ImageU8;
use cascade_detector::scan::scan;
use cascade_detector::{CancelToken, CascadeDetector, DetectorParams, ScaleMode, ScanParams};
use common::cascades::{always_reject, bright_centre, bright_window};
use common::init_logger;
use common::synthetic_image::{checkerboard_u8, noise_u8, square_u8};

fn view(buf: &[u8], w: usize, h: usize) -> ImageU8<'_> {
    ImageU8::new(w, h, w, buf).expect("valid buffer")
}

fn raw_scan_params(mode: ScaleMode) -> ScanParams {
    ScanParams::default()
        .with_normalization(Normalization::None)
        .with_scale_factor(2.0)
        .with_window_bounds(12, None)
        .with_scale_mode(mode)
}

#[test]
fn bright_square_is_found_at_its_own_size() {
    init_logger();
    let buf = square_u8(64, 64, (24, 16), 16, 0, 255);
    for mode in [ScaleMode::ScaleFeatures, ScaleMode::ResampleImage] {
        let params = DetectorParams::default().with_scan(raw_scan_params(mode));
        let detector = CascadeDetector::new(bright_window(8, 250.0), params).unwrap();
        let found = detector.detect(view(&buf, 64, 64)).unwrap();
        assert_eq!(found.len(), 1, "{mode:?}");
        let det = found.as_slice()[0];
        assert_eq!((det.x, det.y, det.width, det.height), (24, 16, 16, 16), "{mode:?}");
        assert_eq!(det.scale, 2.0);
    }
}

#[test]
fn variance_normalization_ignores_contrast_gain() {
    init_logger();
    let strong = square_u8(64, 64, (24, 16), 16, 50, 200);
    let weak = square_u8(64, 64, (24, 16), 16, 25, 100);
    let detector = CascadeDetector::new(bright_centre(), DetectorParams::default()).unwrap();

    let a = detector.detect(view(&strong, 64, 64)).unwrap();
    let b = detector.detect(view(&weak, 64, 64)).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn rejecting_cascade_yields_nothing_on_any_image() {
    init_logger();
    let cascade = always_reject(8);
    let params = ScanParams::default();
    let images = [
        checkerboard_u8(80, 60, 8),
        noise_u8(80, 60, 7),
        vec![128u8; 80 * 60],
    ];
    for buf in &images {
        assert!(scan(&cascade, view(buf, 80, 60), &params).unwrap().is_empty());
    }
}

#[test]
fn image_below_min_window_is_empty_not_error() {
    let buf = vec![255u8; 16 * 16];
    let params = DetectorParams::default().with_scan(ScanParams::default().with_window_bounds(24, None));
    let detector = CascadeDetector::new(bright_window(8, 0.0), params).unwrap();
    assert!(detector.detect(view(&buf, 16, 16)).unwrap().is_empty());

    // Smaller than the canonical window itself.
    let tiny = vec![255u8; 4 * 4];
    let detector = CascadeDetector::new(bright_window(8, 0.0), DetectorParams::default()).unwrap();
    assert!(detector.detect(view(&tiny, 4, 4)).unwrap().is_empty());
}

#[test]
fn zero_sized_input_fails_fast() {
    let detector = CascadeDetector::new(bright_window(8, 0.0), DetectorParams::default()).unwrap();
    let empty = ImageU8 {
        w: 0,
        h: 0,
        stride: 0,
        data: &[],
    };
    let err = detector.detect(empty).unwrap_err();
    assert!(matches!(
        err,
        DetectError::Input(InputError::ZeroDimensions { width: 0, height: 0 })
    ));
}

#[test]
fn cancelled_token_stops_detection() {
    let buf = checkerboard_u8(64, 64, 8);
    let detector = CascadeDetector::new(bright_centre(), DetectorParams::default()).unwrap();
    let token = CancelToken::new();
    assert!(detector.detect_with_cancel(view(&buf, 64, 64), &token).is_ok());

    token.cancel();
    let err = detector.detect_with_cancel(view(&buf, 64, 64), &token).unwrap_err();
    assert!(matches!(err, DetectError::Cancelled { .. }));
}

#[test]
fn exhausted_deadline_is_reported() {
    let buf = checkerboard_u8(64, 64, 8);
    let params = DetectorParams::default().with_deadline_ms(0);
    let detector = CascadeDetector::new(bright_centre(), params).unwrap();
    let err = detector.detect(view(&buf, 64, 64)).unwrap_err();
    assert!(matches!(err, DetectError::DeadlineExceeded { .. }));
}

#[test]
fn invalid_scan_params_are_rejected_up_front() {
    let params = DetectorParams::default().with_scan(ScanParams::default().with_overlap_threshold(0.0));
    assert!(matches!(
        CascadeDetector::new(bright_centre(), params),
        Err(ConfigError::InvalidParam { name: "overlap_threshold", .. })
    ));

    let mut detector = CascadeDetector::new(bright_centre(), DetectorParams::default()).unwrap();
    assert!(detector
        .set_scan_params(ScanParams::default().with_step_fraction(2.0))
        .is_err());
    assert_eq!(detector.params().scan, ScanParams::default());
}

#[test]
fn diagnostics_account_for_every_window() {
    init_logger();
    let buf = square_u8(96, 72, (40, 20), 24, 40, 210);
    let detector = CascadeDetector::new(bright_centre(), DetectorParams::default()).unwrap();
    let report = detector.detect_with_diagnostics(view(&buf, 96, 72)).unwrap();

    assert_eq!((report.input.width, report.input.height), (96, 72));
    assert!(!report.levels.is_empty());
    for level in &report.levels {
        let rejected: usize = level.rejections_by_stage.iter().sum();
        assert_eq!(rejected + level.accepted, level.windows_evaluated);
    }
    let accepted: usize = report.levels.iter().map(|l| l.accepted).sum();
    assert_eq!(report.merge.raw, accepted);
    assert_eq!(report.merge.kept, report.detections.len());
    assert!(report.timings.stage_ms("merge").is_some());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["levels"][0]["windowWidth"].is_u64());
    assert!(json["merge"]["suppressed"].is_u64());
}

#[test]
fn repeated_runs_are_identical() {
    let buf = noise_u8(120, 90, 42);
    let detector = CascadeDetector::new(bright_centre(), DetectorParams::default()).unwrap();
    let first = detector.detect(view(&buf, 120, 90)).unwrap();
    let second = detector.detect(view(&buf, 120, 90)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cascade_loaded_from_json_detects() {
    init_logger();
    let dir = std::env::temp_dir().join(format!("cascade_detector_e2e_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let path = dir.join("bright.json");
    std::fs::write(&path, bright_window(8, 250.0).to_json_string().unwrap()).unwrap();
    let cascade = load_cascade(&path).unwrap();

    let params = DetectorParams::default().with_scan(raw_scan_params(ScaleMode::ScaleFeatures));
    let detector = CascadeDetector::new(cascade, params).unwrap();
    let buf = square_u8(64, 64, (24, 16), 16, 0, 255);
    assert_eq!(detector.detect(view(&buf, 64, 64)).unwrap().len(), 1);

    let empty = dir.join("empty.json");
    std::fs::write(&empty, r#"{ "windowWidth": 8, "windowHeight": 8, "stages": [] }"#).unwrap();
    assert!(matches!(load_cascade(&empty), Err(ConfigError::EmptyCascade)));

    std::fs::remove_dir_all(&dir).unwrap();
}
