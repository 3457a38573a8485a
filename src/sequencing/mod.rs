pub mod clock;
pub mod tempo;

pub use clock::FrameClock;
pub use tempo::Tempo;
