#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Standard MIDI timing resolution
pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// 120 BPM
pub const DEFAULT_MICROS_PER_BEAT: u32 = 500_000;

/// Largest values the SMF header (15 bits) and tempo event (24 bits) hold
const MAX_TICKS_PER_BEAT: u16 = 0x7fff;
const MAX_MICROS_PER_BEAT: u32 = 0x00ff_ffff;

/// Tempo and timing resolution used to turn seconds into MIDI ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Tempo {
    /// Pulses per quarter note
    pub ticks_per_beat: u16,
    /// Length of one beat in microseconds
    pub micros_per_beat: u32,
}

impl Tempo {
    pub const fn new(ticks_per_beat: u16, micros_per_beat: u32) -> Self {
        Self {
            ticks_per_beat,
            micros_per_beat,
        }
    }

    /// Both fields must be non-zero and fit their MIDI file fields
    pub fn validate(&self) -> Result<()> {
        if (1..=MAX_TICKS_PER_BEAT).contains(&self.ticks_per_beat)
            && (1..=MAX_MICROS_PER_BEAT).contains(&self.micros_per_beat)
        {
            Ok(())
        } else {
            Err(Error::InvalidTempo {
                ticks_per_beat: self.ticks_per_beat,
                micros_per_beat: self.micros_per_beat,
            })
        }
    }

    /// Convert elapsed seconds to ticks
    /// Formula: ticks = round(seconds * ticks_per_beat * 1_000_000 / micros_per_beat)
    /// Negative and NaN inputs clamp to tick 0
    pub fn ticks(&self, seconds: f64) -> u64 {
        let ticks =
            seconds * self.ticks_per_beat as f64 * 1_000_000.0 / self.micros_per_beat as f64;
        if ticks.is_nan() || ticks <= 0.0 {
            0
        } else {
            ticks.round() as u64
        }
    }

    /// Convert ticks back to seconds
    pub fn seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.micros_per_beat as f64 / (self.ticks_per_beat as f64 * 1_000_000.0)
    }

    /// Tempo in beats per minute
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.micros_per_beat as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_BEAT, DEFAULT_MICROS_PER_BEAT)
    }
}
