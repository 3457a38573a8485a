//! Brightness/hue to note quantization.
//!
//! The 0-255 input domain is cut into `12 * octaves` equal, half-open buckets,
//! each mapped to one chromatic step of a range centred on MIDI note 64.

pub mod octaves;
pub mod table;

pub use octaves::Octaves;
pub use table::{QuantizationLevel, QuantizationTable};
