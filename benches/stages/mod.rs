//! One module per pipeline stage.

mod convert;
mod debounce;
mod quantize;

pub use convert::bench_convert;
pub use debounce::bench_debounce;
pub use quantize::bench_quantize;
