//! Signal-processing primitives: FFT, analysis window, spectral frames.

pub mod fft;
pub mod spectrum;
pub mod window;

pub use fft::{Complex, FftEngine};
pub use spectrum::{peak_bin, SpectralFrameBuilder};
pub use window::{hann_window, WindowCache};
