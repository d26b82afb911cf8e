//! Clustering of pipe boxes into top/bottom pairs and gap derivation.

use flappy_core::BBox;
use serde::Serialize;

/// Boxes whose left edges sit within this many pixels of a group's key
/// share the group.
pub const GROUP_KEY_DISTANCE: i32 = 20;

/// One clustered pipe pair. `gap` is the passable vertical opening
/// `(gap_top, gap_bottom)`; it is `None` for incomplete groups (a single
/// member) and for degenerate groups whose members overlap vertically.
/// Member boxes stay drawable either way, but incomplete and degenerate
/// groups carry no score line and are never marked crossed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeGroup {
    pub left_edge: i32,
    pub members: Vec<BBox>,
    /// Right edge of the member extending furthest right. Only present
    /// alongside a valid gap.
    pub score_line_x: Option<i32>,
    pub gap: Option<(i32, i32)>,
    /// Whether the avatar has passed this group's score line. Filled in
    /// by the analyzer when an avatar is present.
    pub crossed: bool,
}

/// Cluster pipe boxes by left-edge proximity.
///
/// Boxes are sorted by left edge first so the grouping is independent of
/// contour discovery order; each box then joins the first group whose key
/// lies within `GROUP_KEY_DISTANCE`, or starts a new group keyed by its
/// own left edge.
pub fn group_pipes(boxes: &[BBox]) -> Vec<PipeGroup> {
    let mut sorted: Vec<BBox> = boxes.iter().filter(|b| b.is_valid()).copied().collect();
    sorted.sort_by_key(|b| (b.x, b.y));

    let mut groups: Vec<(i32, Vec<BBox>)> = Vec::new();
    for bbox in sorted {
        match groups
            .iter_mut()
            .find(|(key, _)| (bbox.x - *key).abs() < GROUP_KEY_DISTANCE)
        {
            Some((_, members)) => members.push(bbox),
            None => groups.push((bbox.x, vec![bbox])),
        }
    }

    groups
        .into_iter()
        .map(|(key, members)| finish_group(key, members))
        .collect()
}

fn finish_group(key: i32, members: Vec<BBox>) -> PipeGroup {
    let top = members.iter().min_by_key(|b| b.y);
    let bottom = members.iter().max_by_key(|b| b.y);
    let gap = match (top, bottom) {
        (Some(t), Some(b)) if members.len() >= 2 && t.bottom() <= b.y => Some((t.bottom(), b.y)),
        _ => None,
    };
    let score_line_x = gap
        .is_some()
        .then(|| members.iter().map(BBox::right).max())
        .flatten();

    PipeGroup {
        left_edge: key,
        members,
        score_line_x,
        gap,
        crossed: false,
    }
}

/// The avatar has passed a group once its left edge is beyond the score
/// line. Groups without a score line cannot be crossed.
pub fn crossed(avatar: &BBox, group: &PipeGroup) -> bool {
    group.score_line_x.is_some_and(|line| avatar.x > line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_left_edges_share_a_group() {
        let boxes = [BBox::new(100, 0, 30, 120), BBox::new(110, 300, 30, 150)];
        let groups = group_pipes(&boxes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn test_distant_left_edges_split_groups() {
        let boxes = [BBox::new(100, 0, 30, 120), BBox::new(120, 300, 30, 150)];
        let groups = group_pipes(&boxes);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_grouping_ignores_input_order() {
        let a = [
            BBox::new(100, 0, 30, 120),
            BBox::new(112, 300, 30, 150),
            BBox::new(250, 0, 30, 100),
        ];
        let mut b = a;
        b.reverse();
        assert_eq!(group_pipes(&a), group_pipes(&b));
    }

    #[test]
    fn test_gap_and_score_line() {
        let boxes = [BBox::new(100, 0, 30, 120), BBox::new(105, 300, 32, 150)];
        let groups = group_pipes(&boxes);
        assert_eq!(groups[0].gap, Some((120, 300)));
        // bottom pipe reaches x 137, further right than the top's 130
        assert_eq!(groups[0].score_line_x, Some(137));
    }

    #[test]
    fn test_single_member_has_no_gap_or_score_line() {
        let groups = group_pipes(&[BBox::new(100, 0, 30, 120)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].gap, None);
        assert_eq!(groups[0].score_line_x, None);
        assert_eq!(groups[0].members.len(), 1);
        assert!(!crossed(&BBox::new(200, 200, 20, 20), &groups[0]));
    }

    #[test]
    fn test_overlapping_members_are_degenerate() {
        // bottom of the upper box is below the top of the lower box
        let boxes = [BBox::new(100, 0, 30, 320), BBox::new(102, 300, 30, 150)];
        let groups = group_pipes(&boxes);
        assert_eq!(groups[0].gap, None);
        assert_eq!(groups[0].score_line_x, None);
        assert_eq!(groups[0].members.len(), 2);
        // an avatar well past the boxes still does not count a crossing
        assert!(!crossed(&BBox::new(200, 200, 20, 20), &groups[0]));
    }

    #[test]
    fn test_crossing() {
        let groups = group_pipes(&[BBox::new(100, 0, 30, 120), BBox::new(100, 300, 30, 150)]);
        let line = groups[0].score_line_x.unwrap();
        assert!(!crossed(&BBox::new(line - 5, 200, 20, 20), &groups[0]));
        assert!(!crossed(&BBox::new(line, 200, 20, 20), &groups[0]));
        assert!(crossed(&BBox::new(line + 1, 200, 20, 20), &groups[0]));
    }
}
