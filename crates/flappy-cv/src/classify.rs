//! Heuristic accept/reject filtering of candidate regions.

use crate::contour::Candidate;
use flappy_core::BBox;
use serde::{Deserialize, Serialize};

/// Aspect-ratio constraint. Comparisons are computed only when the
/// denominator dimension is non-zero; degenerate boxes are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AspectRule {
    /// No aspect constraint.
    Any,
    /// `max(h, w) / min(h, w)` must stay below the bound (roughly square).
    SymmetricBelow(f32),
    /// `h / w` must exceed the bound (taller than wide).
    TallAbove(f32),
}

impl AspectRule {
    fn accepts(&self, bbox: &BBox) -> bool {
        match *self {
            AspectRule::Any => true,
            AspectRule::SymmetricBelow(bound) => {
                bbox.aspect_symmetric().is_some_and(|r| r < bound)
            }
            AspectRule::TallAbove(bound) => bbox.aspect_tall().is_some_and(|r| r > bound),
        }
    }
}

/// Per-detector geometric accept test. Area bounds are exclusive and
/// apply to the region's measured pixel count; dimension bounds are
/// exclusive and apply to the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeFilter {
    pub min_area: u32,
    pub max_area: Option<u32>,
    pub aspect: AspectRule,
    pub min_width: i32,
    pub min_height: i32,
}

impl ShapeFilter {
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        if candidate.area <= self.min_area {
            return false;
        }
        if let Some(max) = self.max_area {
            if candidate.area >= max {
                return false;
            }
        }
        let bbox = &candidate.bbox;
        bbox.is_valid()
            && bbox.width > self.min_width
            && bbox.height > self.min_height
            && self.aspect.accepts(bbox)
    }
}

/// Keep the boxes of candidates passing the filter, in discovery order.
/// Rejection is silent; zero qualifying regions is an empty result, not
/// an error.
pub fn filter_candidates(candidates: &[Candidate], filter: &ShapeFilter) -> Vec<BBox> {
    candidates
        .iter()
        .filter(|c| filter.accepts(c))
        .map(|c| c.bbox)
        .collect()
}
