#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    detect::DebounceConfig,
    quantize::Octaves,
    sample::{extract::DEFAULT_BLUR_SIGMA, FrameSampler, RegionPosition, RegionSize, SampleMode},
    sequencing::Tempo,
    Result,
};

/// Everything that shapes a conversion apart from the input itself
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct ConvertConfig {
    pub octaves: Octaves,
    pub mode: SampleMode,
    pub region_size: RegionSize,
    pub region_position: RegionPosition,
    /// Gaussian blur applied to the region before measuring, 0 disables
    pub blur_sigma: f32,
    pub debounce: DebounceConfig,
    pub tempo: Tempo,
}

impl ConvertConfig {
    /// Reject settings that could only produce a broken file
    pub fn validate(&self) -> Result<()> {
        self.debounce.validate()?;
        self.tempo.validate()
    }

    /// Frame sampler for the configured region and blur
    pub fn sampler(&self) -> FrameSampler {
        FrameSampler {
            size: self.region_size,
            position: self.region_position,
            blur_sigma: self.blur_sigma.max(0.0),
        }
    }

    /// Load from a JSON file; missing keys keep their defaults
    #[cfg(feature = "serde")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            octaves: Octaves::default(),
            mode: SampleMode::default(),
            region_size: RegionSize::default(),
            region_position: RegionPosition::default(),
            blur_sigma: DEFAULT_BLUR_SIGMA,
            debounce: DebounceConfig::default(),
            tempo: Tempo::default(),
        }
    }
}
