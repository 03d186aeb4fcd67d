mod common;

use cascade_detector::merge::{merge, merge_with_stats};
use cascade_detector::DetectionWindow;
use common::synthetic_image::noise_u8;

fn det(x: u32, y: u32, w: u32, h: u32, score: f64) -> DetectionWindow {
    DetectionWindow {
        x,
        y,
        width: w,
        height: h,
        scale: w as f64 / 24.0,
        score,
    }
}

/// A crowded, deterministic field of boxes with assorted sizes and scores.
fn crowd() -> Vec<DetectionWindow> {
    let bytes = noise_u8(200, 1, 11);
    bytes
        .chunks_exact(4)
        .map(|c| {
            let size = 24 + (c[2] % 24) as u32;
            det(c[0] as u32 / 2, c[1] as u32 / 2, size, size, c[3] as f64 / 255.0)
        })
        .collect()
}

#[test]
fn high_overlap_keeps_only_the_better_box() {
    // 100x100 vs 100x95 nested: IoU = 0.95.
    let low = det(10, 10, 100, 100, 0.2);
    let high = det(10, 10, 100, 95, 0.8);
    assert!(low.iou(&high) >= 0.9);
    let (set, stats) = merge_with_stats(vec![low, high], 0.5);
    assert_eq!(set.as_slice(), &[high]);
    assert_eq!((stats.raw, stats.kept, stats.suppressed), (2, 1, 1));
}

#[test]
fn low_overlap_keeps_both() {
    // 10x10 boxes overlapping in a 2x10 strip: IoU = 20 / 180 ≈ 0.11.
    let a = det(0, 0, 10, 10, 0.7);
    let b = det(8, 0, 10, 10, 0.3);
    assert!(a.iou(&b) < 0.12);
    let set = merge(vec![b, a], 0.5);
    assert_eq!(set.as_slice(), &[a, b]);
}

#[test]
fn output_is_sorted_by_score() {
    let set = merge(crowd(), 0.3);
    assert!(!set.is_empty());
    let scores: Vec<f64> = set.iter().map(|d| d.score).collect();
    assert!(scores.windows(2).all(|p| p[0] >= p[1]), "{scores:?}");
}

#[test]
fn kept_boxes_do_not_overlap_past_threshold() {
    for threshold in [0.1, 0.3, 0.5, 0.9] {
        let kept = merge(crowd(), threshold).into_vec();
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(a.iou(b) < threshold, "{a:?} vs {b:?} at {threshold}");
            }
        }
    }
}

#[test]
fn merging_twice_changes_nothing() {
    for threshold in [0.2, 0.5, 1.0] {
        let once = merge(crowd(), threshold);
        let twice = merge(once.clone().into_vec(), threshold);
        assert_eq!(once, twice);
    }
}

#[test]
fn empty_stays_empty() {
    assert!(merge(Vec::new(), 0.3).is_empty());
}
