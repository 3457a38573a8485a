#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

/// Half-extent of the sampled square as a fraction of the longer frame side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantArray)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RegionSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl RegionSize {
    pub fn fraction(self) -> f64 {
        match self {
            RegionSize::Small => 0.05,
            RegionSize::Medium => 0.1,
            RegionSize::Large => 0.25,
        }
    }
}

/// Where the sampled square sits, as a multiplier of the frame centre
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantArray)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RegionPosition {
    #[strum(to_string = "top-left", serialize = "topleft")]
    #[cfg_attr(feature = "serde", serde(alias = "topleft"))]
    TopLeft,
    #[default]
    Center,
    #[strum(to_string = "bottom-right", serialize = "bottomright")]
    #[cfg_attr(feature = "serde", serde(alias = "bottomright"))]
    BottomRight,
}

impl RegionPosition {
    pub fn offset(self) -> f64 {
        match self {
            RegionPosition::TopLeft => 0.2,
            RegionPosition::Center => 1.0,
            RegionPosition::BottomRight => 1.8,
        }
    }
}

/// Pixel rectangle of the region of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Place the sampling square inside a `width` x `height` frame.
    ///
    /// The square spans `2p` around the scaled centre. If it runs off the
    /// bottom/right edge it snaps to a `p`-sized corner square there, if it
    /// runs off the top/left edge it snaps to the top-left corner instead.
    ///
    /// A frame without pixels yields an empty region at the origin.
    pub fn locate(width: u32, height: u32, size: RegionSize, position: RegionPosition) -> Self {
        if width == 0 || height == 0 {
            return Self {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            };
        }

        let (w, h) = (width as i64, height as i64);
        let p = ((w.max(h) as f64 * size.fraction()) as i64).max(1);
        let cx = (w as f64 / 2.0 * position.offset()) as i64;
        let cy = (h as f64 / 2.0 * position.offset()) as i64;

        let (mut left, mut right, mut top, mut bottom) = (cx - p, cx + p, cy - p, cy + p);
        if right > w || bottom > h {
            (left, right, top, bottom) = (w - p, w, h - p, h);
        }
        if left < 0 || top < 0 {
            (left, right, top, bottom) = (0, p, 0, p);
        }

        // regions bigger than the frame itself are clipped to it
        let left = left.clamp(0, w - 1);
        let top = top.clamp(0, h - 1);
        let right = right.clamp(left + 1, w);
        let bottom = bottom.clamp(top + 1, h);

        Self {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }

    /// Pixels covered
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
