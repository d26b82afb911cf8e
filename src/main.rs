extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use anyhow::Context;
use clap::Parser;
use flappy_core::SessionState;
use flappy_cv::detection::{AnalyzerConfig, FrameAnalyzer};
use flappy_cv::frame::Frame;
use flappy_cv::traits::FrameSource;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Frame analyzer: extracts avatar, pipe, banner, and score state from
/// captured game frames.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Config {
    /// A frame image, or a directory of frames processed in filename order
    #[clap(short, long)]
    input: PathBuf,

    /// Target frame rate for paced playback
    #[clap(long, default_value_t = 60)]
    fps: u32,

    /// Detector configuration JSON overriding the built-in tables
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Disable the score recognition stage
    #[clap(long)]
    no_score: bool,

    /// Print each snapshot as JSON on stdout
    #[clap(long)]
    json: bool,
}

/// File-backed frame source: a single still or a directory of stills.
struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    fn open(input: &Path) -> anyhow::Result<Self> {
        let mut paths = if input.is_dir() {
            std::fs::read_dir(input)
                .with_context(|| format!("failed to read frame directory {:?}", input))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect()
        } else {
            vec![input.to_path_buf()]
        };
        paths.sort();

        if paths.is_empty() {
            anyhow::bail!("no frame images found in {:?}", input);
        }
        Ok(Self { paths, next: 0 })
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> flappy_cv::Result<Option<Frame>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let rgb = image::open(path)
            .with_context(|| format!("failed to load frame {:?}", path))?
            .to_rgb8();
        Ok(Some(Frame::new(rgb)))
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let cli = Config::parse();

    let mut analyzer_config = match &cli.config {
        Some(path) => AnalyzerConfig::from_json_file(path)?,
        None => AnalyzerConfig::default(),
    };
    if cli.no_score {
        analyzer_config.score = None;
    }

    let analyzer = FrameAnalyzer::new(analyzer_config);
    let mut source = ImageDirSource::open(&cli.input)?;

    let budget = Duration::from_secs_f64(1.0 / cli.fps.max(1) as f64);
    let mut session = SessionState::new();
    let mut frame_num: u64 = 0;

    while let Some(frame) = source.next_frame()? {
        let start = Instant::now();

        let (snapshot, next) = analyzer.analyze(&frame, session)?;
        session = next;

        if cli.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        info!(
            "frame {}: avatar={} groups={} banner={} score={} games={} passes={}",
            frame_num,
            snapshot.avatar.is_some(),
            snapshot.obstacles.len(),
            !snapshot.banner.is_empty(),
            snapshot.score,
            snapshot.games_played,
            snapshot.pipes_passed,
        );
        frame_num += 1;

        // Paced playback: sleep out the remainder of the frame budget,
        // or nothing when the frame ran late.
        let elapsed = start.elapsed();
        if elapsed < budget {
            std::thread::sleep(budget - elapsed);
        } else {
            debug!("frame {} late by {:?}", frame_num - 1, elapsed - budget);
        }
    }

    info!(
        "done: {} frame(s), {} game(s), final score {}",
        frame_num, session.games_played, session.score
    );
    Ok(())
}
