//! Note change detection: a debounce window gating transitions between
//! quantized readings.

pub mod debouncer;
pub mod window;

pub use debouncer::{
    DebounceConfig, Debouncer, Gate, NoteSample, OnsetAnchor, PendingNote, DEFAULT_WINDOW,
};
pub use window::{DebounceWindow, WindowEntry};
