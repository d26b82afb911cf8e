//! Per-frame orchestration of the detectors.

use super::config::{AnalyzerConfig, BannerConfig, DetectorConfig};
use crate::frame::Frame;
use crate::pipes::PipeGroup;
use crate::score::{ScoreRecognizer, SCORE_UNKNOWN};
use crate::{banner, classify, contour, mask, pipes, segment};
use flappy_core::{BBox, SessionState};
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Everything extracted from one frame. Built fresh per frame, immutable
/// once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct GameStateSnapshot {
    /// Foremost avatar box, when one was found.
    pub avatar: Option<BBox>,
    pub obstacles: Vec<PipeGroup>,
    pub banner: Vec<BBox>,
    /// Session score after this frame; -1 until a score has been read.
    pub score: i32,
    pub games_played: u32,
    pub pipes_passed: u32,
    pub stats: DetectionStats,
}

/// Per-frame detection counts, for logging and telemetry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DetectionStats {
    pub avatar_boxes: usize,
    pub obstacle_boxes: usize,
    pub banner_boxes: usize,
    pub processing_time_ms: u64,
}

/// Runs the detectors over one frame and assembles a snapshot. Holds no
/// per-frame state; session counters are threaded through `analyze` as
/// an explicit value.
pub struct FrameAnalyzer {
    config: AnalyzerConfig,
    score: Option<ScoreRecognizer>,
}

impl FrameAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let score = config.score.clone().map(ScoreRecognizer::new);
        Self { config, score }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one frame. Detectors finding nothing yield empty snapshot
    /// fields; the only error source is a score region that does not fit
    /// the frame.
    pub fn analyze(
        &self,
        frame: &Frame,
        session: SessionState,
    ) -> crate::Result<(GameStateSnapshot, SessionState)> {
        let start = Instant::now();

        let avatar_boxes = run_box_detector(frame, &self.config.avatar);
        let obstacle_boxes = run_box_detector(frame, &self.config.obstacle);
        let banner_boxes = detect_banner(frame, &self.config.banner);

        let score = match &self.score {
            Some(recognizer) => recognizer.read(frame)?,
            None => SCORE_UNKNOWN,
        };

        let mut session = session.advance(!banner_boxes.is_empty(), score);

        let mut groups = pipes::group_pipes(&obstacle_boxes);
        let avatar = avatar_boxes.first().copied();
        if let Some(avatar) = &avatar {
            for group in &mut groups {
                group.crossed = pipes::crossed(avatar, group);
            }
        }
        session.pipes_passed += groups.iter().filter(|g| g.crossed).count() as u32;

        let stats = DetectionStats {
            avatar_boxes: avatar_boxes.len(),
            obstacle_boxes: obstacle_boxes.len(),
            banner_boxes: banner_boxes.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            "frame analyzed in {}ms: {} avatar, {} obstacle, {} banner box(es)",
            stats.processing_time_ms,
            stats.avatar_boxes,
            stats.obstacle_boxes,
            stats.banner_boxes
        );

        let snapshot = GameStateSnapshot {
            avatar,
            obstacles: groups,
            banner: banner_boxes,
            score: session.score,
            games_played: session.games_played,
            pipes_passed: session.pipes_passed,
            stats,
        };
        Ok((snapshot, session))
    }
}

/// Shared segment/clean/extract/classify chain for the box detectors.
fn run_box_detector(frame: &Frame, config: &DetectorConfig) -> Vec<BBox> {
    let raw = segment::segment(frame, &config.bands, &config.subtract);
    let cleaned = mask::apply_steps(&raw, &config.morph);
    let candidates = contour::extract_regions(&cleaned);
    classify::filter_candidates(&candidates, &config.filter)
}

fn detect_banner(frame: &Frame, config: &BannerConfig) -> Vec<BBox> {
    let raw = segment::band_union(frame, &config.bands);
    let cleaned = mask::apply_steps(&raw, &config.morph);
    let candidates = contour::extract_regions(&cleaned);
    let tiered = banner::tier_candidates(
        &candidates,
        &config.rules,
        frame.width(),
        frame.height(),
    );
    banner::resolve(&tiered, config.rules.cluster_quorum)
}
