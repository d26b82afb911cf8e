//! Three-tier game-over banner detection.
//!
//! The banner renders either as one solid blob or as scattered text
//! fragments, so candidates are bucketed into Large/Medium/Small tiers
//! and the decision is made over the whole frame's candidate set: solid
//! Large evidence wins outright, enough fragments of any tier merge into
//! one enclosing box, and sparse evidence yields nothing.

use crate::contour::Candidate;
use flappy_core::BBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Large,
    Medium,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerCandidate {
    pub bbox: BBox,
    pub area: u32,
    pub tier: Tier,
}

/// Geometric thresholds for one tier. Area and dimension bounds are
/// exclusive; positional windows are exclusive on both ends. Origin
/// windows are absolute pixels, center windows are fractions of the
/// frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub min_area: u32,
    pub max_area: Option<u32>,
    pub min_width: i32,
    pub min_height: i32,
    pub origin_x: Option<(i32, i32)>,
    pub origin_y: Option<(i32, i32)>,
    pub center_frac_x: Option<(f32, f32)>,
    pub center_frac_y: Option<(f32, f32)>,
}

impl TierRule {
    fn matches(&self, c: &Candidate, frame_width: u32, frame_height: u32) -> bool {
        if c.area <= self.min_area {
            return false;
        }
        if let Some(max) = self.max_area {
            if c.area >= max {
                return false;
            }
        }
        if c.bbox.width <= self.min_width || c.bbox.height <= self.min_height {
            return false;
        }
        if let Some((lo, hi)) = self.origin_x {
            if c.bbox.x <= lo || c.bbox.x >= hi {
                return false;
            }
        }
        if let Some((lo, hi)) = self.origin_y {
            if c.bbox.y <= lo || c.bbox.y >= hi {
                return false;
            }
        }
        let (cx, cy) = c.bbox.center();
        if let Some((lo, hi)) = self.center_frac_x {
            let fx = cx / frame_width as f32;
            if fx <= lo || fx >= hi {
                return false;
            }
        }
        if let Some((lo, hi)) = self.center_frac_y {
            let fy = cy / frame_height as f32;
            if fy <= lo || fy >= hi {
                return false;
            }
        }
        true
    }
}

/// Tier thresholds plus the fragment quorum for the fallback decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerRules {
    /// Candidates at or below this pixel count are ignored entirely.
    pub min_area: u32,
    pub large: TierRule,
    pub medium: TierRule,
    pub small: TierRule,
    /// Minimum candidate count (all tiers) for the merged-fragments
    /// fallback.
    pub cluster_quorum: usize,
}

/// Tag each qualifying candidate with its tier. Tiers are mutually
/// exclusive, checked solid-first; untiered candidates are dropped.
pub fn tier_candidates(
    candidates: &[Candidate],
    rules: &BannerRules,
    frame_width: u32,
    frame_height: u32,
) -> Vec<BannerCandidate> {
    candidates
        .iter()
        .filter(|c| c.area > rules.min_area)
        .filter_map(|c| {
            let tier = if rules.large.matches(c, frame_width, frame_height) {
                Some(Tier::Large)
            } else if rules.medium.matches(c, frame_width, frame_height) {
                Some(Tier::Medium)
            } else if rules.small.matches(c, frame_width, frame_height) {
                Some(Tier::Small)
            } else {
                None
            };
            tier.map(|tier| BannerCandidate {
                bbox: c.bbox,
                area: c.area,
                tier,
            })
        })
        .collect()
}

/// Decide over the whole candidate set, first match wins:
/// 1. any Large candidate: exactly the Large boxes
/// 2. at least `quorum` candidates across all tiers: one box enclosing
///    them all
/// 3. otherwise: nothing this frame
pub fn resolve(candidates: &[BannerCandidate], quorum: usize) -> Vec<BBox> {
    let large: Vec<BBox> = candidates
        .iter()
        .filter(|c| c.tier == Tier::Large)
        .map(|c| c.bbox)
        .collect();
    if !large.is_empty() {
        return large;
    }

    if candidates.len() >= quorum {
        let all: Vec<BBox> = candidates.iter().map(|c| c.bbox).collect();
        return BBox::enclosing(&all).into_iter().collect();
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> BannerRules {
        BannerRules {
            min_area: 30,
            large: TierRule {
                min_area: 3000,
                max_area: None,
                min_width: 70,
                min_height: 70,
                origin_x: Some((200, 400)),
                origin_y: Some((250, 400)),
                center_frac_x: None,
                center_frac_y: None,
            },
            medium: TierRule {
                min_area: 500,
                max_area: None,
                min_width: 20,
                min_height: 15,
                origin_x: Some((150, 450)),
                origin_y: Some((200, 500)),
                center_frac_x: None,
                center_frac_y: None,
            },
            small: TierRule {
                min_area: 50,
                max_area: Some(500),
                min_width: 10,
                min_height: 8,
                origin_x: None,
                origin_y: None,
                center_frac_x: Some((0.15, 0.85)),
                center_frac_y: Some((0.2, 0.8)),
            },
            cluster_quorum: 8,
        }
    }

    fn candidate(x: i32, y: i32, w: i32, h: i32, area: u32) -> Candidate {
        Candidate {
            bbox: BBox::new(x, y, w, h),
            area,
        }
    }

    const FRAME: (u32, u32) = (400, 700);

    fn small_fragment(x: i32, y: i32) -> Candidate {
        // 12x10 fragment near frame center: Small tier at 400x700
        candidate(x, y, 12, 10, 100)
    }

    #[test]
    fn test_tiers_are_mutually_exclusive_solid_first() {
        let cands = [
            candidate(250, 300, 80, 80, 6400),
            candidate(200, 300, 30, 20, 600),
            small_fragment(180, 280),
        ];
        let tiered = tier_candidates(&cands, &rules(), FRAME.0, FRAME.1);
        let tiers: Vec<Tier> = tiered.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, vec![Tier::Large, Tier::Medium, Tier::Small]);
    }

    #[test]
    fn test_large_candidates_win_outright() {
        let mut cands = vec![candidate(250, 300, 80, 80, 6400)];
        for i in 0..10 {
            cands.push(small_fragment(150 + i * 14, 300));
        }
        let tiered = tier_candidates(&cands, &rules(), FRAME.0, FRAME.1);
        let boxes = resolve(&tiered, rules().cluster_quorum);
        assert_eq!(boxes, vec![BBox::new(250, 300, 80, 80)]);
    }

    #[test]
    fn test_fragment_quorum_merges_into_one_box() {
        let cands: Vec<Candidate> = (0..8).map(|i| small_fragment(150 + i * 14, 300)).collect();
        let tiered = tier_candidates(&cands, &rules(), FRAME.0, FRAME.1);
        assert_eq!(tiered.len(), 8);

        let boxes = resolve(&tiered, rules().cluster_quorum);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0], BBox::new(150, 300, 7 * 14 + 12, 10));
    }

    #[test]
    fn test_sparse_evidence_yields_nothing() {
        let cands: Vec<Candidate> = (0..7).map(|i| small_fragment(150 + i * 14, 300)).collect();
        let tiered = tier_candidates(&cands, &rules(), FRAME.0, FRAME.1);
        assert!(resolve(&tiered, rules().cluster_quorum).is_empty());
    }

    #[test]
    fn test_tiny_candidates_are_ignored() {
        let cands = [candidate(250, 300, 6, 5, 30)];
        assert!(tier_candidates(&cands, &rules(), FRAME.0, FRAME.1).is_empty());
    }
}
