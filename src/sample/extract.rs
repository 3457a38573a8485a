#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

use image::{imageops, RgbImage};

use super::{
    color::Hsv,
    region::{Region, RegionPosition, RegionSize},
};
use crate::{Error, Result};

/// Velocity used when only brightness drives the notes
pub const FIXED_VELOCITY: u8 = 110;

/// Velocity range brightness is mapped onto in hue mode
pub const VELOCITY_RANGE: (u8, u8) = (75, 127);

/// Largest hue in 8-bit HSV
const MAX_HUE: f64 = 179.0;

/// Sigma of a 15x15 Gaussian kernel
pub const DEFAULT_BLUR_SIGMA: f32 = 2.6;

/// What one frame contributes: a 0-255 scalar for the quantizer and a velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub value: u8,
    pub velocity: u8,
}

/// Mean HSV components over the region of interest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    /// Mean hue in half-degrees, `[0, 180)`
    pub mean_hue: f64,
    pub mean_saturation: f64,
    pub mean_value: f64,
}

impl RegionStats {
    pub fn measure(image: &RgbImage) -> Self {
        let (mut h, mut s, mut v) = (0u64, 0u64, 0u64);
        for pixel in image.pixels() {
            let hsv = Hsv::from_rgb(pixel.0);
            h += hsv.h as u64;
            s += hsv.s as u64;
            v += hsv.v as u64;
        }

        let count = (image.width() as u64 * image.height() as u64).max(1) as f64;
        Self {
            mean_hue: h as f64 / count,
            mean_saturation: s as f64 / count,
            mean_value: v as f64 / count,
        }
    }
}

/// Reduces region statistics to a reading
pub trait SampleExtractor: Send + Sync {
    fn extract(&self, stats: &RegionStats) -> Reading;
}

/// Notes follow brightness, velocity is constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub velocity: u8,
}

impl Default for Brightness {
    fn default() -> Self {
        Self {
            velocity: FIXED_VELOCITY,
        }
    }
}

impl SampleExtractor for Brightness {
    fn extract(&self, stats: &RegionStats) -> Reading {
        Reading {
            value: stats.mean_value.clamp(0.0, 255.0) as u8,
            velocity: self.velocity,
        }
    }
}

/// Notes follow hue, velocity follows brightness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HueWeighted;

impl SampleExtractor for HueWeighted {
    fn extract(&self, stats: &RegionStats) -> Reading {
        let value = rescale(stats.mean_hue, (0.0, MAX_HUE), (0.0, 255.0));
        let (lo, hi) = VELOCITY_RANGE;
        let velocity = rescale(stats.mean_value, (0.0, 255.0), (lo as f64, hi as f64));
        Reading {
            value: value as u8,
            velocity: velocity as u8,
        }
    }
}

/// Linear map between ranges, clamped to the target range
fn rescale(x: f64, (from_lo, from_hi): (f64, f64), (to_lo, to_hi): (f64, f64)) -> f64 {
    let t = ((x - from_lo) / (from_hi - from_lo)).clamp(0.0, 1.0);
    to_lo + t * (to_hi - to_lo)
}

/// Which channel of the image drives the notes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantArray)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SampleMode {
    /// Brightness only
    #[default]
    Mono,
    /// Hue for pitch, brightness for velocity
    All,
}

impl SampleMode {
    pub fn extractor(self) -> Box<dyn SampleExtractor> {
        match self {
            SampleMode::Mono => Box::new(Brightness::default()),
            SampleMode::All => Box::new(HueWeighted),
        }
    }
}

/// Crops, blurs and measures the region of interest of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSampler {
    pub size: RegionSize,
    pub position: RegionPosition,
    /// 0 disables blurring
    pub blur_sigma: f32,
}

impl FrameSampler {
    /// Where the region of interest falls in `frame`
    pub fn region(&self, frame: &RgbImage) -> Region {
        Region::locate(frame.width(), frame.height(), self.size, self.position)
    }

    /// Mean HSV of the (blurred) region. Frames without pixels are an error.
    pub fn measure(&self, frame: &RgbImage) -> Result<RegionStats> {
        let region = self.region(frame);
        if region.area() == 0 {
            return Err(Error::EmptyFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }

        let roi =
            imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();
        Ok(if self.blur_sigma > 0.0 {
            RegionStats::measure(&imageops::blur(&roi, self.blur_sigma))
        } else {
            RegionStats::measure(&roi)
        })
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self {
            size: RegionSize::default(),
            position: RegionPosition::default(),
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}
