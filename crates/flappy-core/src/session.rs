//! Per-session bookkeeping carried across frames.

use serde::{Deserialize, Serialize};

/// Session counters threaded through the analysis loop: passed into each
/// frame analysis, returned updated. `advance` is the only mutation point.
///
/// A score of -1 means no legible score has been read yet, which is not
/// the same as a visible score of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub games_played: u32,
    pub score: i32,
    /// Cumulative score-line crossings in the current run.
    pub pipes_passed: u32,
    pub banner_visible: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            games_played: 0,
            score: -1,
            pipes_passed: 0,
            banner_visible: false,
        }
    }

    /// Apply one frame's observations.
    ///
    /// Two-state machine over the game-over banner:
    /// - banner newly visible: one more game played
    /// - banner newly gone: score tracking and the pass counter restart
    ///   at 0 for the new run
    ///
    /// `recognized_score` below zero means recognition failed this frame;
    /// the previous score is retained rather than zeroed.
    pub fn advance(self, banner_detected: bool, recognized_score: i32) -> SessionState {
        let mut next = self;

        if banner_detected && !self.banner_visible {
            next.games_played += 1;
        }
        if !banner_detected && self.banner_visible {
            next.score = 0;
            next.pipes_passed = 0;
        }
        if recognized_score >= 0 {
            next.score = recognized_score;
        }
        next.banner_visible = banner_detected;

        next
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_edge_counts_one_game() {
        // banner absent, present, present, absent
        let mut s = SessionState::new();
        s = s.advance(false, -1);
        assert_eq!(s.games_played, 0);
        s = s.advance(true, -1);
        assert_eq!(s.games_played, 1);
        s = s.advance(true, -1);
        assert_eq!(s.games_played, 1);
        s = s.advance(false, -1);
        assert_eq!(s.games_played, 1);
    }

    #[test]
    fn test_score_resets_once_on_banner_clear() {
        let mut s = SessionState::new();
        s = s.advance(false, 7);
        assert_eq!(s.score, 7);
        s = s.advance(true, -1);
        assert_eq!(s.score, 7);
        s = s.advance(true, -1);
        s = s.advance(false, -1);
        assert_eq!(s.score, 0);
        s = s.advance(false, -1);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_pass_counter_resets_on_banner_clear() {
        let mut s = SessionState::new();
        s.pipes_passed = 3;
        s = s.advance(true, -1);
        assert_eq!(s.pipes_passed, 3);
        s = s.advance(false, -1);
        assert_eq!(s.pipes_passed, 0);
    }

    #[test]
    fn test_failed_recognition_retains_score() {
        let mut s = SessionState::new();
        s = s.advance(false, 12);
        s = s.advance(false, -1);
        assert_eq!(s.score, 12);
        s = s.advance(false, 0);
        assert_eq!(s.score, 0);
    }
}
