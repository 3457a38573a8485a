//! Turn the brightness or hue of a video region into MIDI notes.
//!
//! Each frame is reduced to one 0-255 reading, quantized onto a chromatic
//! range and passed through a debouncer that decides when a note starts and
//! stops. The resulting note events are written out as a Standard MIDI File.

pub mod config;
pub mod convert;
pub mod detect; // Debounced note change detection
pub mod error;
pub mod io;
pub mod quantize; // Sample to note mapping
pub mod sample;
pub mod sequencing; // Tempo and frame timing

pub use config::ConvertConfig;
pub use convert::{Conversion, Converter, Progress, ProgressSink, StopSignal};
pub use error::{Error, Result};
