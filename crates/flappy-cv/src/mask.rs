//! Binary masks and morphological cleanup.

use image::GrayImage;
use serde::{Deserialize, Serialize};

pub const ON: u8 = 255;

/// Binary (0/255) buffer with the spatial dimensions of its source
/// region. Ephemeral, one per detector invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }

    /// Binarize a grayscale image: strictly above `threshold` is foreground.
    pub fn from_gray_threshold(gray: &GrayImage, threshold: u8) -> Self {
        let mut mask = Mask::zeros(gray.width(), gray.height());
        for (dst, px) in mask.data.iter_mut().zip(gray.pixels()) {
            if px.0[0] > threshold {
                *dst = ON;
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[(y * self.width + x) as usize] != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        self.data[(y * self.width + x) as usize] = if on { ON } else { 0 };
    }

    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Union, in place. Panics on dimension mismatch: masks from different
    /// regions are never combined.
    pub fn or_assign(&mut self, other: &Mask) {
        assert_eq!((self.width, self.height), (other.width, other.height));
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            if *b != 0 {
                *a = ON;
            }
        }
    }

    /// Set-difference, in place: clears every pixel set in `other`.
    pub fn and_not_assign(&mut self, other: &Mask) {
        assert_eq!((self.width, self.height), (other.width, other.height));
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            if *b != 0 {
                *a = 0;
            }
        }
    }

    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_raw(self.width, self.height, self.data.clone())
            .expect("mask buffer matches its dimensions")
    }

    /// Scale up by an integer factor with smooth interpolation, then
    /// re-binarize at the midpoint.
    pub fn upsample_smooth(&self, factor: u32) -> Mask {
        let gray = self.to_gray();
        let scaled = image::imageops::resize(
            &gray,
            self.width * factor,
            self.height * factor,
            image::imageops::FilterType::Triangle,
        );
        Mask::from_gray_threshold(&scaled, 127)
    }
}

/// Structuring element shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelShape {
    Rect,
    Ellipse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MorphOp {
    /// Dilate then erode: fills small holes, bridges small gaps.
    Close,
    /// Erode then dilate: removes isolated speckle.
    Open,
}

/// One morphology pass; a detector config carries an ordered list of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphStep {
    pub op: MorphOp,
    pub shape: KernelShape,
    pub width: u32,
    pub height: u32,
}

impl MorphStep {
    pub fn close(shape: KernelShape, width: u32, height: u32) -> Self {
        Self {
            op: MorphOp::Close,
            shape,
            width,
            height,
        }
    }

    pub fn open(shape: KernelShape, width: u32, height: u32) -> Self {
        Self {
            op: MorphOp::Open,
            shape,
            width,
            height,
        }
    }
}

/// Anchor-centered neighborhood offsets for a structuring element.
fn kernel_offsets(shape: KernelShape, width: u32, height: u32) -> Vec<(i32, i32)> {
    let cx = (width / 2) as i32;
    let cy = (height / 2) as i32;
    let rx = (width.saturating_sub(1) as f32 / 2.0).max(0.5);
    let ry = (height.saturating_sub(1) as f32 / 2.0).max(0.5);

    let mut offsets = Vec::new();
    for j in 0..height as i32 {
        for i in 0..width as i32 {
            let keep = match shape {
                KernelShape::Rect => true,
                KernelShape::Ellipse => {
                    let nx = (i - cx) as f32 / rx;
                    let ny = (j - cy) as f32 / ry;
                    nx * nx + ny * ny <= 1.0
                }
            };
            if keep {
                offsets.push((i - cx, j - cy));
            }
        }
    }
    offsets
}

/// Out-of-bounds neighbors count as background, so dilation never grows
/// past the frame edge.
pub fn dilate(mask: &Mask, shape: KernelShape, width: u32, height: u32) -> Mask {
    let offsets = kernel_offsets(shape, width, height);
    let mut out = Mask::zeros(mask.width(), mask.height());

    for y in 0..mask.height() as i32 {
        for x in 0..mask.width() as i32 {
            let hit = offsets.iter().any(|&(dx, dy)| {
                let (nx, ny) = (x + dx, y + dy);
                nx >= 0
                    && ny >= 0
                    && nx < mask.width() as i32
                    && ny < mask.height() as i32
                    && mask.get(nx as u32, ny as u32)
            });
            if hit {
                out.set(x as u32, y as u32, true);
            }
        }
    }
    out
}

/// Out-of-bounds neighbors count as foreground, so erosion does not eat
/// regions touching the frame edge.
pub fn erode(mask: &Mask, shape: KernelShape, width: u32, height: u32) -> Mask {
    let offsets = kernel_offsets(shape, width, height);
    let mut out = Mask::zeros(mask.width(), mask.height());

    for y in 0..mask.height() as i32 {
        for x in 0..mask.width() as i32 {
            let all = offsets.iter().all(|&(dx, dy)| {
                let (nx, ny) = (x + dx, y + dy);
                nx < 0
                    || ny < 0
                    || nx >= mask.width() as i32
                    || ny >= mask.height() as i32
                    || mask.get(nx as u32, ny as u32)
            });
            if all {
                out.set(x as u32, y as u32, true);
            }
        }
    }
    out
}

pub fn apply_step(mask: &Mask, step: &MorphStep) -> Mask {
    match step.op {
        MorphOp::Close => erode(
            &dilate(mask, step.shape, step.width, step.height),
            step.shape,
            step.width,
            step.height,
        ),
        MorphOp::Open => dilate(
            &erode(mask, step.shape, step.width, step.height),
            step.shape,
            step.width,
            step.height,
        ),
    }
}

/// Run the config's morphology steps in order.
pub fn apply_steps(mask: &Mask, steps: &[MorphStep]) -> Mask {
    let mut current = mask.clone();
    for step in steps {
        current = apply_step(&current, step);
    }
    current
}
