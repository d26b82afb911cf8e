//! Flappy-vision detection pipeline
//!
//! Extracts structured game state from screen-capture frames of a
//! side-scrolling obstacle game: avatar location, pipe geometry, the
//! game-over banner, and the numeric score.

pub mod banner;
pub mod classify;
pub mod contour;
pub mod detection;
pub mod frame;
pub mod mask;
pub mod pipes;
pub mod score;
pub mod segment;

// Re-export commonly used types
pub use classify::ShapeFilter;
pub use contour::Candidate;
pub use detection::{AnalyzerConfig, DetectorConfig, FrameAnalyzer, GameStateSnapshot};
pub use frame::{Frame, FrameError, Region};
pub use mask::Mask;
pub use pipes::PipeGroup;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the pipeline's external seams
pub mod traits {
    use crate::frame::Frame;

    /// Trait for whatever feeds frames into the analysis loop (screen
    /// grabber, video decoder, a directory of stills in tests).
    pub trait FrameSource {
        /// Next frame, or `None` once the source is exhausted.
        fn next_frame(&mut self) -> crate::Result<Option<Frame>>;
    }
}
