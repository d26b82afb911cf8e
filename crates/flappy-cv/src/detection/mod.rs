//! Detector configuration tables and the per-frame orchestrator.

pub mod analyzer;
pub mod config;

pub use analyzer::{DetectionStats, FrameAnalyzer, GameStateSnapshot};
pub use config::{AnalyzerConfig, BannerConfig, DetectorConfig};
