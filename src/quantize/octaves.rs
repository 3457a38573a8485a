use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::Error;

/// Supported octave spans for the quantizer
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, VariantArray)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum Octaves {
    #[default]
    One = 1,
    Three = 3,
    Seven = 7,
}

impl Octaves {
    /// Number of octaves as an integer
    pub const fn count(self) -> u8 {
        self as u8
    }

    /// Number of chromatic steps the quantizer distributes over 0-255
    pub const fn semitones(self) -> u16 {
        12 * self as u16
    }
}

impl TryFrom<u8> for Octaves {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Octaves::One),
            3 => Ok(Octaves::Three),
            7 => Ok(Octaves::Seven),
            other => Err(Error::UnsupportedOctaves(other)),
        }
    }
}

impl From<Octaves> for u8 {
    fn from(octaves: Octaves) -> Self {
        octaves.count()
    }
}

impl FromStr for Octaves {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::InvalidOctaves(s.to_string()))?;
        Octaves::try_from(value)
    }
}

impl Display for Octaves {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_counts() {
        assert_eq!(Octaves::try_from(1).unwrap(), Octaves::One);
        assert_eq!(Octaves::try_from(3).unwrap(), Octaves::Three);
        assert_eq!(Octaves::try_from(7).unwrap(), Octaves::Seven);
    }

    #[test]
    fn rejects_other_counts() {
        for value in [0u8, 2, 4, 5, 6, 8, 12, 255] {
            assert!(matches!(
                Octaves::try_from(value),
                Err(Error::UnsupportedOctaves(v)) if v == value
            ));
        }
    }

    #[test]
    fn parses_from_strings() {
        assert_eq!("3".parse::<Octaves>().unwrap(), Octaves::Three);
        assert_eq!(" 7 ".parse::<Octaves>().unwrap(), Octaves::Seven);
        assert!(matches!(
            "two".parse::<Octaves>(),
            Err(Error::InvalidOctaves(text)) if text == "two"
        ));
        assert!(matches!("2".parse::<Octaves>(), Err(Error::UnsupportedOctaves(2))));
        assert_eq!(
            "two".parse::<Octaves>().unwrap_err().to_string(),
            "invalid octave range \"two\" (expected 1, 3 or 7)"
        );
    }

    #[test]
    fn semitone_counts() {
        let counts: Vec<u16> = Octaves::VARIANTS.iter().map(|o| o.semitones()).collect();
        assert_eq!(counts, vec![12, 36, 84]);
    }
}
