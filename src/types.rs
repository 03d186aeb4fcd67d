use serde::{Deserialize, Serialize};

/// A window accepted by every cascade stage, in original image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Window size relative to the canonical cascade window.
    pub scale: f64,
    /// Score of the final cascade stage.
    pub score: f64,
}

impl DetectionWindow {
    #[inline]
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Intersection over union of the two boxes, `0.0` when either is empty.
    pub fn iou(&self, other: &DetectionWindow) -> f64 {
        let ix0 = self.x.max(other.x) as f64;
        let iy0 = self.y.max(other.y) as f64;
        let ix1 = (self.x as f64 + self.width as f64).min(other.x as f64 + other.width as f64);
        let iy1 = (self.y as f64 + self.height as f64).min(other.y as f64 + other.height as f64);
        let inter = (ix1 - ix0).max(0.0) * (iy1 - iy0).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// `(x, y, width, height, score)` output tuple.
    pub fn to_tuple(&self) -> (u32, u32, u32, u32, f64) {
        (self.x, self.y, self.width, self.height, self.score)
    }
}

/// Final detections of one call, highest score first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionSet(Vec<DetectionWindow>);

impl DetectionSet {
    /// Wrap detections that are already in descending-score order.
    pub(crate) fn from_sorted(detections: Vec<DetectionWindow>) -> Self {
        debug_assert!(detections.windows(2).all(|p| p[0].score >= p[1].score));
        Self(detections)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionWindow> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DetectionWindow] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<DetectionWindow> {
        self.0
    }
}

impl IntoIterator for DetectionSet {
    type Item = DetectionWindow;
    type IntoIter = std::vec::IntoIter<DetectionWindow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a DetectionWindow;
    type IntoIter = std::slice::Iter<'a, DetectionWindow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: u32, y: u32, w: u32, h: u32) -> DetectionWindow {
        DetectionWindow {
            x,
            y,
            width: w,
            height: h,
            scale: 1.0,
            score: 0.0,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = det(3, 4, 10, 10);
        assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn iou_of_disjoint_and_touching_boxes_is_zero() {
        assert_eq!(det(0, 0, 5, 5).iou(&det(10, 10, 5, 5)), 0.0);
        assert_eq!(det(0, 0, 5, 5).iou(&det(5, 0, 5, 5)), 0.0);
    }

    #[test]
    fn iou_of_half_shifted_boxes() {
        // Overlap 5x10 = 50, union 150.
        let iou = det(0, 0, 10, 10).iou(&det(5, 0, 10, 10));
        assert!((iou - 1.0 / 3.0).abs() < 1e-12);
    }
}
