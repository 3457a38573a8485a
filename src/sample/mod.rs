//! Frame sampling: reduce a region of a video frame to one reading per frame.

pub mod color;
pub mod extract;
pub mod region;

pub use color::Hsv;
pub use extract::{
    Brightness, FrameSampler, HueWeighted, Reading, RegionStats, SampleExtractor, SampleMode,
};
pub use region::{Region, RegionPosition, RegionSize};
