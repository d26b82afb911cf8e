//! Frame buffer wrapper and region-of-interest cropping.

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("buffer of {len} bytes does not hold a {width}x{height} rgb frame")]
    BufferSize { len: usize, width: u32, height: u32 },
    #[error("region {region:?} exceeds frame bounds {width}x{height}")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
}

/// A fixed sub-rectangle of the frame reserved for one detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One captured frame. Immutable input for a single analysis pass; the
/// pipeline never writes back into it.
#[derive(Debug, Clone)]
pub struct Frame {
    rgb: RgbImage,
}

impl Frame {
    pub fn new(rgb: RgbImage) -> Self {
        Self { rgb }
    }

    /// Wrap a raw packed-RGB buffer as produced by a capture provider.
    pub fn from_raw(width: u32, height: u32, buf: Vec<u8>) -> Result<Self, FrameError> {
        let len = buf.len();
        match RgbImage::from_raw(width, height, buf) {
            Some(rgb) => Ok(Self { rgb }),
            None => Err(FrameError::BufferSize { len, width, height }),
        }
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    /// Copy out a sub-rectangle. A region reaching past the frame edge is
    /// a configuration fault, not a content condition, and errors.
    pub fn roi(&self, region: Region) -> Result<Frame, FrameError> {
        let (w, h) = (self.width(), self.height());
        if region.width == 0
            || region.height == 0
            || region.x + region.width > w
            || region.y + region.height > h
        {
            return Err(FrameError::RegionOutOfBounds {
                region,
                width: w,
                height: h,
            });
        }

        let cropped =
            image::imageops::crop_imm(&self.rgb, region.x, region.y, region.width, region.height)
                .to_image();
        Ok(Frame::new(cropped))
    }

    pub fn to_gray(&self) -> GrayImage {
        image::imageops::grayscale(&self.rgb)
    }
}
