use cascade_detector::cascade::{HaarFeature, Stage, WeakClassifier, WeightedRect};
use cascade_detector::image::ImageU8;
use cascade_detector::{CascadeDetector, CascadeModel, DetectError, DetectorParams};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Demo: a dark 24x24 square on a light 320x240 background, found with a
/// two-stage cascade built in code.
fn run() -> Result<(), DetectError> {
    let (w, h) = (320usize, 240usize);
    let mut gray = vec![200u8; w * h];
    for y in 100..124 {
        for x in 150..174 {
            gray[y * w + x] = 30;
        }
    }
    let image = ImageU8::new(w, h, w, &gray)?;

    let detector = CascadeDetector::new(demo_cascade()?, DetectorParams::default())?;
    let report = detector.detect_with_diagnostics(image)?;
    println!("{}", report.summary());
    for d in &report.detections {
        println!(
            "x={} y={} w={} h={} scale={:.2} score={:.3}",
            d.x, d.y, d.width, d.height, d.scale, d.score
        );
    }
    Ok(())
}

fn demo_cascade() -> Result<CascadeModel, DetectError> {
    // Whole window minus four times the centre quarter: zero on flat
    // regions, positive when the centre is darker than its surround.
    let centre_surround = HaarFeature::new(vec![
        WeightedRect::new(0, 0, 24, 24, 1.0),
        WeightedRect::new(6, 6, 12, 12, -4.0),
    ]);
    let top_edge = HaarFeature::new(vec![
        WeightedRect::new(0, 0, 24, 3, 1.0),
        WeightedRect::new(0, 3, 24, 3, -1.0),
    ]);
    let stages = vec![
        Stage {
            classifiers: vec![WeakClassifier {
                feature: centre_surround,
                threshold: 0.0,
                polarity: -1,
                weight: 1.0,
            }],
            threshold: 1.0,
        },
        Stage {
            classifiers: vec![WeakClassifier {
                feature: top_edge,
                threshold: -1.0,
                polarity: -1,
                weight: 1.0,
            }],
            threshold: 0.5,
        },
    ];
    Ok(CascadeModel::new(24, 24, stages)?)
}
