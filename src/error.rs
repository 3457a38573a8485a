use std::fmt;

/// Errors produced while configuring or running a conversion
#[derive(Debug)]
pub enum Error {
    /// Octave range outside the supported set (1, 3 or 7)
    UnsupportedOctaves(u8),
    /// Octave range that is not a number at all
    InvalidOctaves(String),
    /// Frame rate is zero, negative or not a number
    InvalidFrameRate(f64),
    /// Debounce window too small to ever disagree with itself
    InvalidWindow(usize),
    /// Timing resolution or beat length a MIDI file cannot carry
    InvalidTempo {
        ticks_per_beat: u16,
        micros_per_beat: u32,
    },
    /// Frame has no pixels
    EmptyFrame { width: u32, height: u32 },
    /// Raw stream ended in the middle of a frame
    TruncatedFrame { expected: usize, actual: usize },
    /// Input the frame decoders cannot handle
    UnsupportedInput(String),
    Image(image::ImageError),
    Io(std::io::Error),
    #[cfg(feature = "serde")]
    Config(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedOctaves(octaves) => {
                write!(f, "unsupported octave range {octaves} (expected 1, 3 or 7)")
            }
            Error::InvalidOctaves(text) => {
                write!(f, "invalid octave range {text:?} (expected 1, 3 or 7)")
            }
            Error::InvalidFrameRate(fps) => {
                write!(f, "invalid frame rate {fps}: must be a positive number")
            }
            Error::InvalidWindow(size) => {
                write!(f, "debounce window of {size} entries is too small (minimum 2)")
            }
            Error::InvalidTempo {
                ticks_per_beat,
                micros_per_beat,
            } => write!(
                f,
                "invalid tempo: {ticks_per_beat} ticks per beat (1-32767), \
                 {micros_per_beat} us per beat (1-16777215)"
            ),
            Error::EmptyFrame { width, height } => {
                write!(f, "frame size {width}x{height} has no pixels")
            }
            Error::TruncatedFrame { expected, actual } => {
                write!(
                    f,
                    "stream ended mid-frame: expected {expected} bytes, got {actual}"
                )
            }
            Error::UnsupportedInput(reason) => write!(f, "unsupported input: {reason}"),
            Error::Image(err) => write!(f, "image decoding failed: {err}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
            #[cfg(feature = "serde")]
            Error::Config(err) => write!(f, "invalid configuration file: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Image(err) => Some(err),
            Error::Io(err) => Some(err),
            #[cfg(feature = "serde")]
            Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err)
    }
}
