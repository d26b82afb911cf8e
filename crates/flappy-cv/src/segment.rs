//! Color-space segmentation: HSV thresholding into binary masks.

use crate::frame::Frame;
use crate::mask::Mask;
use serde::{Deserialize, Serialize};

/// Inclusive HSV range, 8-bit convention: hue in 0..=179, saturation and
/// value in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvBand {
    pub hue: (u8, u8),
    pub sat: (u8, u8),
    pub val: (u8, u8),
}

impl HsvBand {
    pub const fn new(hue: (u8, u8), sat: (u8, u8), val: (u8, u8)) -> Self {
        Self { hue, sat, val }
    }

    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        self.hue.0 <= h
            && h <= self.hue.1
            && self.sat.0 <= s
            && s <= self.sat.1
            && self.val.0 <= v
            && v <= self.val.1
    }
}

/// 8-bit HSV with hue halved into 0..=179.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    let diff = (max - min) as f32;

    if diff == 0.0 {
        return (0, 0, v);
    }

    let s = (diff * 255.0 / max as f32).round() as u8;

    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let mut hue = if max == r {
        60.0 * (gf - bf) / diff
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    ((hue / 2.0).round() as u8 % 180, s, v)
}

/// Mask of pixels falling inside any of the given bands. An empty band
/// list or an all-background frame yields an all-zero mask.
pub fn band_union(frame: &Frame, bands: &[HsvBand]) -> Mask {
    let mut mask = Mask::zeros(frame.width(), frame.height());

    for (x, y, px) in frame.rgb().enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(px.0[0], px.0[1], px.0[2]);
        if bands.iter().any(|band| band.contains(h, s, v)) {
            mask.set(x, y, true);
        }
    }
    mask
}

/// Full segmentation for one detector: the union of its color bands,
/// minus the union of its background look-alike bands.
pub fn segment(frame: &Frame, bands: &[HsvBand], subtract: &[HsvBand]) -> Mask {
    let mut mask = band_union(frame, bands);
    if !subtract.is_empty() {
        let background = band_union(frame, subtract);
        mask.and_not_assign(&background);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv(255, 255, 255), (0, 0, 255));
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
    }

    #[test]
    fn test_band_union_selects_only_matching_pixels() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 255])); // h=120
        img.put_pixel(1, 0, Rgb([255, 0, 0])); // h=0
        img.put_pixel(2, 0, Rgb([0, 255, 0])); // h=60
        let frame = Frame::new(img);

        let bands = [
            HsvBand::new((110, 130), (100, 255), (100, 255)),
            HsvBand::new((55, 65), (100, 255), (100, 255)),
        ];
        let mask = band_union(&frame, &bands);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(2, 0));
    }

    #[test]
    fn test_segment_subtracts_background() {
        let mut img = RgbImage::new(2, 1);
        // Both pixels sit in the foreground hue range; only the brighter
        // one also matches the background band.
        img.put_pixel(0, 0, Rgb([62, 150, 62]));
        img.put_pixel(1, 0, Rgb([105, 250, 105]));
        let frame = Frame::new(img);

        let bands = [HsvBand::new((36, 75), (85, 187), (84, 255))];
        let subtract = [HsvBand::new((36, 75), (85, 187), (200, 255))];
        let mask = segment(&frame, &bands, &subtract);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
    }

    #[test]
    fn test_empty_input_yields_empty_mask() {
        let frame = Frame::new(RgbImage::new(4, 4));
        let mask = segment(&frame, &[HsvBand::new((0, 179), (50, 255), (50, 255))], &[]);
        assert_eq!(mask.count_on(), 0);
    }
}
