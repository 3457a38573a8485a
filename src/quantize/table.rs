use super::Octaves;

/// Upper bound of the input domain (exclusive)
const DOMAIN_END: u16 = 256;

/// Note the chromatic range is centred on
const CENTRE_NOTE: u16 = 64;

/// One bucket of the quantization table: inputs in `[lo, hi)` map to `note`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationLevel {
    pub lo: u16,
    pub hi: u16,
    pub note: u8,
}

impl QuantizationLevel {
    /// Half-open membership test
    pub fn contains(&self, value: u8) -> bool {
        (self.lo..self.hi).contains(&(value as u16))
    }

    /// Width of the bucket in input units
    pub fn width(&self) -> u16 {
        self.hi - self.lo
    }
}

/// Immutable mapping from a 0-255 sample to a MIDI note number.
///
/// Levels are contiguous, ascending and cover `[0, 256)`. Integer division
/// leaves a remainder at the top of the domain, so the last level is widened
/// up to 256 to absorb it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    octaves: Octaves,
    levels: Vec<QuantizationLevel>,
}

impl QuantizationTable {
    /// Build the `12 * octaves` levels covering 0-255
    pub fn new(octaves: Octaves) -> Self {
        let steps = octaves.semitones();
        let step = DOMAIN_END / steps;
        let base_note = CENTRE_NOTE - steps / 2;

        let levels = (1..=steps)
            .map(|j| {
                let hi = if j == steps { DOMAIN_END } else { j * step };
                QuantizationLevel {
                    lo: (j - 1) * step,
                    hi,
                    // at most 64 - 42 + 84 = 106, always a valid MIDI key
                    note: (base_note + j) as u8,
                }
            })
            .collect();

        Self { octaves, levels }
    }

    /// Note for a sample value.
    ///
    /// Binary search over upper bounds; the widened last level guarantees a
    /// match for every `u8`.
    pub fn note_for(&self, value: u8) -> u8 {
        let idx = self.levels.partition_point(|level| level.hi <= value as u16);
        self.levels[idx].note
    }

    /// Level containing `value`
    pub fn level_for(&self, value: u8) -> &QuantizationLevel {
        let idx = self.levels.partition_point(|level| level.hi <= value as u16);
        &self.levels[idx]
    }

    /// Octave range the table was built for
    pub fn octaves(&self) -> Octaves {
        self.octaves
    }

    /// Levels in ascending input order
    pub fn levels(&self) -> &[QuantizationLevel] {
        &self.levels
    }

    /// Every note the table can produce, lowest first
    pub fn notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.iter().map(|level| level.note)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Note for input 0
    pub fn lowest_note(&self) -> u8 {
        self.levels[0].note
    }

    /// Note for input 255
    pub fn highest_note(&self) -> u8 {
        self.levels[self.levels.len() - 1].note
    }
}
