//! External connected-region extraction from binary masks.

use crate::mask::Mask;
use flappy_core::BBox;
use serde::Serialize;

/// One foreground region: its bounding box and its measured pixel count.
/// The two are independent inputs to classification; `area` is not
/// `width * height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub bbox: BBox,
    pub area: u32,
}

/// Find all 8-connected foreground regions. Scan order is row-major, so
/// discovery order is deterministic for a given mask: regions appear
/// sorted by the position of their topmost-leftmost pixel.
pub fn extract_regions(mask: &Mask) -> Vec<Candidate> {
    let (width, height) = (mask.width(), mask.height());
    let mut visited = vec![false; (width * height) as usize];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if visited[idx] || !mask.get(x, y) {
                continue;
            }

            // Flood one region.
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
            let mut area = 0u32;
            visited[idx] = true;
            stack.push((x, y));

            while let Some((px, py)) = stack.pop() {
                area += 1;
                min_x = min_x.min(px);
                min_y = min_y.min(py);
                max_x = max_x.max(px);
                max_y = max_y.max(py);

                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let (nx, ny) = (px as i32 + dx, py as i32 + dy);
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        let (nx, ny) = (nx as u32, ny as u32);
                        let nidx = (ny * width + nx) as usize;
                        if !visited[nidx] && mask.get(nx, ny) {
                            visited[nidx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            regions.push(Candidate {
                bbox: BBox::new(
                    min_x as i32,
                    min_y as i32,
                    (max_x - min_x + 1) as i32,
                    (max_y - min_y + 1) as i32,
                ),
                area,
            });
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let mut mask = Mask::zeros(rows[0].len() as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                mask.set(x as u32, y as u32, ch == '#');
            }
        }
        mask
    }

    #[test]
    fn test_two_separate_regions() {
        let mask = mask_from_rows(&[
            "##......",
            "##......",
            "........",
            ".....###",
            ".....###",
        ]);
        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].bbox, BBox::new(0, 0, 2, 2));
        assert_eq!(regions[0].area, 4);
        assert_eq!(regions[1].bbox, BBox::new(5, 3, 3, 2));
        assert_eq!(regions[1].area, 6);
    }

    #[test]
    fn test_diagonal_pixels_are_connected() {
        let mask = mask_from_rows(&["#...", ".#..", "..#."]);
        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 3);
        assert_eq!(regions[0].bbox, BBox::new(0, 0, 3, 3));
    }

    #[test]
    fn test_area_is_pixel_count_not_rect_area() {
        // L shape: bounding box 3x3 but only 5 pixels on
        let mask = mask_from_rows(&["#..", "#..", "###"]);
        let regions = extract_regions(&mask);
        assert_eq!(regions[0].area, 5);
        assert_eq!(regions[0].bbox.rect_area(), 9);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mask = mask_from_rows(&["#.#.#", ".....", "#.#.#"]);
        let first = extract_regions(&mask);
        let second = extract_regions(&mask);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_empty_mask_yields_no_regions() {
        assert!(extract_regions(&Mask::zeros(8, 8)).is_empty());
    }
}
