use cascade_detector::cascade::{HaarFeature, Stage, WeakClassifier, WeightedRect};
use cascade_detector::CascadeModel;

fn single_stage(size: u32, classifier: WeakClassifier, threshold: f64) -> CascadeModel {
    CascadeModel::new(
        size,
        size,
        vec![Stage {
            classifiers: vec![classifier],
            threshold,
        }],
    )
    .expect("valid cascade")
}

/// Accepts windows whose raw mean exceeds `mean` (use with
/// `Normalization::None`).
pub fn bright_window(size: u32, mean: f64) -> CascadeModel {
    single_stage(
        size,
        WeakClassifier {
            feature: HaarFeature::new(vec![WeightedRect::new(0, 0, size, size, 1.0)]),
            threshold: mean * (size * size) as f64,
            polarity: -1,
            weight: 1.0,
        },
        1.0,
    )
}

/// 8x8 centre/surround: accepts windows whose central 4x4 block is brighter
/// than the ring around it.
pub fn bright_centre() -> CascadeModel {
    single_stage(
        8,
        WeakClassifier {
            feature: HaarFeature::new(vec![
                WeightedRect::new(0, 0, 8, 8, 1.0),
                WeightedRect::new(2, 2, 4, 4, -4.0),
            ]),
            threshold: 0.0,
            polarity: 1,
            weight: 1.0,
        },
        1.0,
    )
}

/// A classifier that can never vote, so its stage rejects everything.
pub fn always_reject(size: u32) -> CascadeModel {
    single_stage(
        size,
        WeakClassifier {
            feature: HaarFeature::new(vec![WeightedRect::new(0, 0, size, size, 1.0)]),
            threshold: -1.0e12,
            polarity: 1,
            weight: 1.0,
        },
        0.5,
    )
}
