//! Pipeline orchestration.
//!
//! One processing cycle: read a PCM frame from the audio source, convert
//! to normalized floats, feed the waveform ring, apply the Hann window,
//! transform, build the zoomed spectral frame, push it onto the waterfall
//! backlog, then sleep out the rest of the update interval. The loop runs
//! on a dedicated thread that exclusively owns the source and all scratch
//! buffers; the renderer only ever sees copy-on-read snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::axis::FrequencyAxisMapper;
use crate::config::{PipelineConfig, SharedConfig};
use crate::dsp::fft::{Complex, FftEngine};
use crate::dsp::spectrum::{peak_bin, SpectralFrameBuilder};
use crate::dsp::window::WindowCache;
use crate::error::{Result, SpecfallError};
use crate::history::HistoryBuffer;
use crate::source::AudioSource;
use crate::waveform::WaveformRingBuffer;

/// Floor applied to the configured update interval.
///
/// Policy choice carried over from the original pacing behavior: shorter
/// intervals are accepted in the config but clamped here to bound CPU use
/// and lock contention.
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(20);

/// Lifecycle of the processing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Created, loop not yet started.
    Idle,
    /// Loop thread is processing cycles.
    Running,
    /// Loop has been stopped; the source is released.
    Stopped,
}

/// Handle to the spectral analysis pipeline.
///
/// Owns the loop thread and shares the waterfall backlog and waveform ring
/// with it. All renderer-facing reads go through snapshot methods, so the
/// loop never blocks on the renderer beyond a brief mutex hold.
pub struct Pipeline {
    config: SharedConfig,
    state: PipelineState,
    history: Arc<Mutex<HistoryBuffer>>,
    waveform: Arc<Mutex<WaveformRingBuffer>>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Creates an idle pipeline around a validated configuration handle.
    pub fn new(config: SharedConfig) -> Self {
        let max_history = config.get().max_history_size;
        Pipeline {
            config,
            state: PipelineState::Idle,
            history: Arc::new(Mutex::new(HistoryBuffer::new(max_history))),
            waveform: Arc::new(Mutex::new(WaveformRingBuffer::new())),
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Clone of the live configuration handle.
    pub fn config(&self) -> SharedConfig {
        self.config.clone()
    }

    /// Starts the processing loop, pulling frames from `source`.
    ///
    /// The source is started on the caller's thread so acquisition
    /// failures surface here as [`SpecfallError::SourceUnavailable`] and
    /// the loop never begins. Only valid from `Idle`; a repeated call is
    /// logged and ignored.
    pub fn start(&mut self, mut source: Box<dyn AudioSource>) -> Result<()> {
        if self.state != PipelineState::Idle {
            tracing::warn!("start() ignored: pipeline is {:?}", self.state);
            return Ok(());
        }

        let configured_rate = self.config.get().sample_rate;
        if source.sample_rate() != configured_rate {
            return Err(SpecfallError::SourceUnavailable(format!(
                "source delivers {} Hz but the pipeline is configured for {} Hz",
                source.sample_rate(),
                configured_rate
            )));
        }

        source.start()?;

        let config = self.config.clone();
        let history = Arc::clone(&self.history);
        let waveform = Arc::clone(&self.waveform);
        let stop_flag = Arc::clone(&self.stop_flag);

        self.worker = Some(
            thread::Builder::new()
                .name("specfall-loop".into())
                .spawn(move || run_loop(config, history, waveform, stop_flag, source))
                .map_err(|e| {
                    SpecfallError::SourceUnavailable(format!("failed to spawn loop thread: {e}"))
                })?,
        );
        self.state = PipelineState::Running;
        tracing::info!("pipeline started");
        Ok(())
    }

    /// Stops the loop and releases the audio source.
    ///
    /// Idempotent; safe to call from any state, including repeatedly.
    /// Blocks until the loop thread has exited so the source is guaranteed
    /// released on return.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("pipeline loop thread panicked");
            }
        }
        if self.state == PipelineState::Running {
            self.state = PipelineState::Stopped;
            tracing::info!("pipeline stopped");
        }
    }

    /// Copy of the waterfall backlog, newest frame first.
    pub fn history_snapshot(&self) -> Vec<Vec<f32>> {
        self.history.lock().unwrap().snapshot()
    }

    /// Copy of the waveform ring plus its write cursor.
    pub fn waveform_snapshot(&self) -> (Vec<f32>, usize) {
        self.waveform.lock().unwrap().snapshot()
    }

    /// Frequency of the strongest bin in the most recent spectral frame.
    ///
    /// `None` while the backlog is empty or when the latest frame is
    /// silence.
    pub fn dominant_frequency_hz(&self) -> Option<f32> {
        let config = self.config.get();
        let mapper = FrequencyAxisMapper::new(config.sample_rate, config.fft_size);
        let min_bin = mapper.bin_for_frequency(config.min_frequency_hz);

        let history = self.history.lock().unwrap();
        let frame = history.latest()?;
        let peak = peak_bin(frame)?;
        Some(mapper.frequency_for_bin(min_bin + peak))
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Per-cycle scratch owned exclusively by the loop thread, re-sized only
/// when `fft_size` changes between cycles.
struct CycleScratch {
    fft_size: usize,
    engine: FftEngine,
    pcm: Vec<i16>,
    samples: Vec<f32>,
    windowed: Vec<f32>,
    spectrum: Vec<Complex>,
}

impl CycleScratch {
    fn new(fft_size: usize) -> Result<Self> {
        Ok(CycleScratch {
            fft_size,
            engine: FftEngine::new(fft_size)?,
            pcm: vec![0; fft_size],
            samples: vec![0.0; fft_size],
            windowed: vec![0.0; fft_size],
            spectrum: vec![Complex::ZERO; fft_size],
        })
    }
}

fn run_loop(
    config: SharedConfig,
    history: Arc<Mutex<HistoryBuffer>>,
    waveform: Arc<Mutex<WaveformRingBuffer>>,
    stop_flag: Arc<AtomicBool>,
    mut source: Box<dyn AudioSource>,
) {
    let mut window = WindowCache::new();
    let mut builder = SpectralFrameBuilder::new();
    let mut scratch: Option<CycleScratch> = None;

    while !stop_flag.load(Ordering::Relaxed) {
        let cycle_start = Instant::now();
        let cfg = config.get();

        // A cap lowered since last cycle sheds excess frames now, whether
        // or not this cycle produces a push.
        history.lock().unwrap().set_max_len(cfg.max_history_size);

        match scratch {
            Some(ref s) if s.fft_size == cfg.fft_size => {}
            _ => match CycleScratch::new(cfg.fft_size) {
                Ok(s) => scratch = Some(s),
                Err(e) => {
                    // Unreachable while SharedConfig validates edits.
                    tracing::error!("invalid fft_size reached the loop: {e}");
                    break;
                }
            },
        }
        let s = scratch.as_mut().unwrap();

        let read = source.read(&mut s.pcm);
        if read == s.fft_size {
            process_cycle(&cfg, s, &mut window, &mut builder, &history, &waveform);
        } else {
            tracing::debug!("short read ({read} of {}), cycle skipped", s.fft_size);
        }

        let interval = Duration::from_millis(cfg.update_interval_ms).max(MIN_UPDATE_INTERVAL);
        if let Some(remaining) = interval.checked_sub(cycle_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    source.stop();
    tracing::debug!("pipeline loop exited, source released");
}

fn process_cycle(
    cfg: &PipelineConfig,
    s: &mut CycleScratch,
    window: &mut WindowCache,
    builder: &mut SpectralFrameBuilder,
    history: &Mutex<HistoryBuffer>,
    waveform: &Mutex<WaveformRingBuffer>,
) {
    // PCM to normalized floats in [-1, 1].
    for (out, &pcm) in s.samples.iter_mut().zip(s.pcm.iter()) {
        *out = pcm as f32 / i16::MAX as f32;
    }

    // Raw (unwindowed) samples feed the waveform display.
    waveform.lock().unwrap().write(&s.samples);

    let coeffs = window.get(s.fft_size);
    for ((out, &sample), &w) in s.windowed.iter_mut().zip(s.samples.iter()).zip(coeffs) {
        *out = sample * w;
    }

    // Scratch sizes are kept in lockstep with fft_size, so this only fails
    // on an internal bug; the frame is dropped rather than the loop killed.
    if let Err(e) = s.engine.process_real(&s.windowed, &mut s.spectrum) {
        tracing::error!("FFT failed: {e}");
        return;
    }

    let frame = builder.build(
        &s.spectrum,
        cfg.sample_rate,
        cfg.min_frequency_hz,
        cfg.max_frequency_hz(),
    );

    // One lock hold per push keeps frames atomic: a snapshot sees a frame
    // entirely or not at all.
    history.lock().unwrap().push(frame);
}
