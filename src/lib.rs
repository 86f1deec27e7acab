//! Real-time audio spectral analysis pipeline.
//!
//! specfall turns a live mono PCM stream into two renderer-ready products:
//! a bounded, newest-first backlog of normalized spectral frames (the
//! "waterfall") and a rolling ring buffer of raw time-domain samples (the
//! waveform). The processing loop runs on its own thread: read a frame
//! from an [`AudioSource`], apply a Hann window, transform it with the
//! built-in radix-2 FFT, normalize and zoom-clip the magnitudes, and push
//! the results into the shared buffers.
//!
//! Rendering, capture-device handling, and persistence are explicitly out
//! of scope: the source is a trait the caller implements, and the renderer
//! consumes snapshots plus [`FrequencyAxisMapper`] tick positions.
//!
//! ```no_run
//! use specfall::{Pipeline, PipelineConfig, SharedConfig, ToneSource};
//!
//! let config = SharedConfig::new(PipelineConfig {
//!     sample_rate: 48000,
//!     fft_size: 512,
//!     ..Default::default()
//! })?;
//! let mut pipeline = Pipeline::new(config);
//! pipeline.start(Box::new(ToneSource::new(48000, 1000.0, 0.8)))?;
//! // ... renderer reads pipeline.history_snapshot() / waveform_snapshot()
//! pipeline.stop();
//! # Ok::<(), specfall::SpecfallError>(())
//! ```

pub mod axis;
pub mod config;
pub mod dsp;
pub mod error;
pub mod history;
pub mod logging;
pub mod pipeline;
pub mod source;
pub mod waveform;

pub use axis::{FrequencyAxisMapper, TickScale, DEFAULT_TICK_COUNT};
pub use config::{PipelineConfig, SharedConfig};
pub use dsp::{hann_window, Complex, FftEngine, SpectralFrameBuilder};
pub use error::{Result, SpecfallError};
pub use history::HistoryBuffer;
pub use pipeline::{Pipeline, PipelineState, MIN_UPDATE_INTERVAL};
pub use source::{AudioSource, BufferSource, ToneSource};
pub use waveform::{WaveformRingBuffer, WAVEFORM_CAPACITY};
