//! Axis-aligned bounding boxes, top-left origin.

use serde::{Deserialize, Serialize};

/// A detection rectangle. Every box surfaced by the pipeline satisfies
/// `width > 0 && height > 0`; zero-sized regions are filtered out before
/// they reach a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate one past the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Geometric area of the rectangle. Distinct from a region's pixel
    /// count, which is measured during contour extraction.
    pub fn rect_area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `height / width`, or `None` when width is zero.
    pub fn aspect_tall(&self) -> Option<f32> {
        if self.width > 0 {
            Some(self.height as f32 / self.width as f32)
        } else {
            None
        }
    }

    /// `max(h, w) / min(h, w)`, or `None` when either dimension is zero.
    pub fn aspect_symmetric(&self) -> Option<f32> {
        let long = self.width.max(self.height);
        let short = self.width.min(self.height);
        if short > 0 {
            Some(long as f32 / short as f32)
        } else {
            None
        }
    }

    /// Minimal rectangle enclosing every box in the slice.
    pub fn enclosing(boxes: &[BBox]) -> Option<BBox> {
        let first = boxes.first()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.right();
        let mut max_y = first.bottom();

        for b in &boxes[1..] {
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.right());
            max_y = max_y.max(b.bottom());
        }

        Some(BBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let b = BBox::new(10, 20, 30, 40);
        assert_eq!(b.right(), 40);
        assert_eq!(b.bottom(), 60);
        assert_eq!(b.center(), (25.0, 40.0));
        assert!(b.is_valid());
    }

    #[test]
    fn test_aspect_guards_zero_dimensions() {
        assert_eq!(BBox::new(0, 0, 0, 10).aspect_tall(), None);
        assert_eq!(BBox::new(0, 0, 0, 10).aspect_symmetric(), None);
        assert_eq!(BBox::new(0, 0, 10, 20).aspect_tall(), Some(2.0));
        assert_eq!(BBox::new(0, 0, 10, 25).aspect_symmetric(), Some(2.5));
    }

    #[test]
    fn test_enclosing() {
        let boxes = [BBox::new(10, 10, 5, 5), BBox::new(30, 2, 10, 4)];
        let hull = BBox::enclosing(&boxes).unwrap();
        assert_eq!(hull, BBox::new(10, 2, 30, 13));
        assert_eq!(BBox::enclosing(&[]), None);
    }
}
