//! Template-based score recognition over a fixed frame region.

use crate::classify::ShapeFilter;
use crate::contour::{self, Candidate};
use crate::frame::{Frame, Region};
use crate::mask::{self, Mask, MorphStep};
use crate::segment::{self, HsvBand};
use flappy_core::glyph::{self, GlyphPattern, GLYPH_COLS, GLYPH_ROWS};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Recognition returned no legible score this frame. Callers must not
/// confuse this with a visible score of zero.
pub const SCORE_UNKNOWN: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Where the score renders, relative to the frame origin.
    pub roi: Region,
    /// Near-white bands gating whether glyphs are present at all.
    pub presence_bands: Vec<HsvBand>,
    pub presence_filter: ShapeFilter,
    /// Grayscale binarization threshold for the recognition mask.
    pub gray_threshold: u8,
    pub closing: MorphStep,
    /// Integer upscale applied before component extraction, so glyph
    /// strokes have enough resolution for matching.
    pub upsample: u32,
    /// Component filter applied at the upsampled scale.
    pub glyph_filter: ShapeFilter,
    /// Acceptance bar on the template match score.
    pub match_bar: f32,
}

pub struct ScoreRecognizer {
    config: ScoreConfig,
}

impl ScoreRecognizer {
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Read the score from the frame's score region. Returns
    /// [`SCORE_UNKNOWN`] when no glyph is present or none is recognized;
    /// errors only when the configured region does not fit the frame.
    pub fn read(&self, frame: &Frame) -> crate::Result<i32> {
        let roi = frame.roi(self.config.roi)?;
        Ok(self.read_region(&roi))
    }

    /// Recognition over an already-cropped score region.
    pub fn read_region(&self, roi: &Frame) -> i32 {
        // Cheap presence gate before the heavier recognition pass.
        let presence = segment::band_union(roi, &self.config.presence_bands);
        let present = contour::extract_regions(&presence)
            .iter()
            .any(|c| self.config.presence_filter.accepts(c));
        if !present {
            trace!("score region has no glyph-sized components");
            return SCORE_UNKNOWN;
        }

        let gray = roi.to_gray();
        let binary = Mask::from_gray_threshold(&gray, self.config.gray_threshold);
        let cleaned = mask::apply_step(&binary, &self.config.closing);
        let upsampled = cleaned.upsample_smooth(self.config.upsample.max(1));

        let mut glyphs: Vec<Candidate> = contour::extract_regions(&upsampled)
            .into_iter()
            .filter(|c| self.config.glyph_filter.accepts(c))
            .collect();
        // Left-to-right reading order
        glyphs.sort_by_key(|c| c.bbox.x);

        let digits = self.classify_glyphs(&upsampled, &glyphs);
        if digits.is_empty() {
            return SCORE_UNKNOWN;
        }

        let value = digits.iter().fold(0i64, |acc, d| {
            (acc * 10 + d.to_digit(10).unwrap_or(0) as i64).min(i32::MAX as i64)
        });
        debug!("recognized score {} from {} glyph(s)", value, digits.len());
        value as i32
    }

    fn classify_glyphs(&self, mask: &Mask, glyphs: &[Candidate]) -> Vec<char> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            glyphs
                .par_iter()
                .filter_map(|c| self.classify_glyph(mask, c))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            glyphs
                .iter()
                .filter_map(|c| self.classify_glyph(mask, c))
                .collect()
        }
    }

    /// Canonicalize one component to the 3x5 grid and match it against
    /// the digit catalog. Unrecognized glyphs are dropped, not replaced.
    fn classify_glyph(&self, mask: &Mask, glyph: &Candidate) -> Option<char> {
        let bbox = glyph.bbox;
        let crop = image::imageops::crop_imm(
            &mask.to_gray(),
            bbox.x as u32,
            bbox.y as u32,
            bbox.width as u32,
            bbox.height as u32,
        )
        .to_image();
        let tiny = image::imageops::resize(
            &crop,
            GLYPH_COLS as u32,
            GLYPH_ROWS as u32,
            image::imageops::FilterType::Triangle,
        );

        let mut pattern: GlyphPattern = [[0; GLYPH_COLS]; GLYPH_ROWS];
        for row in 0..GLYPH_ROWS {
            for col in 0..GLYPH_COLS {
                // Midpoint binarization of the averaged cell intensity
                if tiny.get_pixel(col as u32, row as u32).0[0] > 127 {
                    pattern[row][col] = 1;
                }
            }
        }

        glyph::classify(&pattern, self.config.match_bar)
    }
}
