//! Built-in detector tables.
//!
//! Every heuristic constant of the pipeline lives here, one table per
//! detector kind, so environments with different game skins or capture
//! scaling can substitute values without touching algorithm code.

use crate::banner::{BannerRules, TierRule};
use crate::classify::{AspectRule, ShapeFilter};
use crate::frame::Region;
use crate::mask::{KernelShape, MorphStep};
use crate::score::ScoreConfig;
use crate::segment::HsvBand;
use anyhow::Context;
use flappy_core::glyph;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Segmentation, cleanup, and classification settings for one box
/// detector (avatar, obstacle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Color bands whose union forms the raw mask.
    pub bands: Vec<HsvBand>,
    /// Background look-alike bands removed from the raw mask.
    pub subtract: Vec<HsvBand>,
    /// Morphology passes, applied in order.
    pub morph: Vec<MorphStep>,
    pub filter: ShapeFilter,
}

/// Banner detection settings: one color band plus the tier rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerConfig {
    pub bands: Vec<HsvBand>,
    pub morph: Vec<MorphStep>,
    pub rules: BannerRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub avatar: DetectorConfig,
    pub obstacle: DetectorConfig,
    pub banner: BannerConfig,
    /// Score recognition is an optional stage; `None` disables it and
    /// every frame reports an unknown score.
    pub score: Option<ScoreConfig>,
}

impl DetectorConfig {
    /// Avatar: body blues plus yellow, red, and cyan accents, roughly
    /// square, cleaned with a small elliptical kernel.
    pub fn avatar() -> Self {
        Self {
            bands: vec![
                HsvBand::new((95, 125), (150, 255), (100, 255)),
                HsvBand::new((95, 105), (160, 185), (200, 255)),
                HsvBand::new((5, 15), (200, 255), (200, 255)),
                HsvBand::new((15, 25), (100, 130), (200, 255)),
            ],
            subtract: vec![],
            morph: vec![
                MorphStep::close(KernelShape::Ellipse, 3, 3),
                MorphStep::open(KernelShape::Ellipse, 3, 3),
            ],
            filter: ShapeFilter {
                min_area: 100,
                max_area: Some(2000),
                aspect: AspectRule::SymmetricBelow(2.5),
                min_width: 12,
                min_height: 12,
            },
        }
    }

    /// Obstacle: pipe greens minus the similar-hue background, with a
    /// final tall closing to fuse a pipe's segmented pieces.
    pub fn obstacle() -> Self {
        Self {
            bands: vec![HsvBand::new((36, 75), (85, 187), (84, 253))],
            subtract: vec![HsvBand::new((60, 80), (29, 157), (200, 252))],
            morph: vec![
                MorphStep::close(KernelShape::Rect, 5, 5),
                MorphStep::open(KernelShape::Rect, 5, 5),
                MorphStep::close(KernelShape::Rect, 7, 15),
            ],
            filter: ShapeFilter {
                min_area: 50,
                max_area: None,
                aspect: AspectRule::TallAbove(0.3),
                min_width: 5,
                min_height: 8,
            },
        }
    }
}

impl BannerConfig {
    /// Game-over banner: orange lettering, positional windows tuned to
    /// where the banner renders on a 400x700 capture.
    pub fn game_over() -> Self {
        Self {
            bands: vec![HsvBand::new((10, 25), (100, 255), (100, 255))],
            morph: vec![MorphStep::close(KernelShape::Rect, 3, 3)],
            rules: BannerRules {
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
            },
        }
    }
}

impl ScoreConfig {
    /// Score digits: white glyphs in a small strip near the top-left of
    /// the frame.
    pub fn top_left() -> Self {
        Self {
            roi: Region::new(8, 8, 160, 48),
            presence_bands: vec![HsvBand::new((0, 179), (0, 60), (200, 255))],
            presence_filter: ShapeFilter {
                min_area: 20,
                max_area: None,
                aspect: AspectRule::Any,
                min_width: 5,
                min_height: 8,
            },
            gray_threshold: 180,
            closing: MorphStep::close(KernelShape::Rect, 3, 3),
            upsample: 4,
            glyph_filter: ShapeFilter {
                min_area: 50,
                max_area: None,
                aspect: AspectRule::Any,
                min_width: 8,
                min_height: 15,
            },
            match_bar: glyph::MATCH_BAR,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            avatar: DetectorConfig::avatar(),
            obstacle: DetectorConfig::obstacle(),
            banner: BannerConfig::game_over(),
            score: Some(ScoreConfig::top_left()),
        }
    }
}

impl AnalyzerConfig {
    /// Load a full configuration from a JSON file, for tuning against a
    /// different capture geometry without rebuilding.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {:?}", path.as_ref()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config: {:?}", path.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_json_round_trip() {
        let config = AnalyzerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalyzerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_builtin_tables() {
        let avatar = DetectorConfig::avatar();
        assert_eq!(avatar.bands.len(), 4);
        assert!(avatar.subtract.is_empty());

        let obstacle = DetectorConfig::obstacle();
        assert_eq!(obstacle.subtract.len(), 1);
        assert_eq!(obstacle.morph.len(), 3);
    }
}
