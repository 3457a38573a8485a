// Purpose - external interfaces: frame decoding in, MIDI files out

pub mod animation;
pub mod frames;
pub mod midi;

pub use animation::AnimationSource;
pub use frames::{FrameSource, RawVideoSource, VecSource};
pub use midi::{MidiEvent, NoteEvent, SmfWriter};
