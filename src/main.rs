//! Demo binary: runs the pipeline against a synthetic tone source and
//! prints what a renderer would consume. Useful for eyeballing the
//! analysis without wiring up a capture backend.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use specfall::{
    Pipeline, PipelineConfig, SharedConfig, TickScale, ToneSource, DEFAULT_TICK_COUNT,
};

#[derive(Parser)]
#[command(name = "specfall", about = "Real-time spectral analysis pipeline demo")]
struct Cli {
    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,

    /// FFT size (power of two)
    #[arg(long, default_value_t = 1024)]
    fft_size: usize,

    /// Update interval in ms (a 20 ms floor applies)
    #[arg(long, default_value_t = 30)]
    interval_ms: u64,

    /// Waterfall depth in frames
    #[arg(long, default_value_t = 100)]
    history: usize,

    /// Lower edge of the displayed frequency range in Hz
    #[arg(long, default_value_t = 0.0)]
    min_freq: f32,

    /// Upper edge of the displayed frequency range in Hz (default: Nyquist)
    #[arg(long)]
    max_freq: Option<f32>,

    /// Frequency of the synthetic test tone in Hz
    #[arg(long, default_value_t = 1000.0)]
    tone: f32,

    /// How long to run, in seconds
    #[arg(long, default_value_t = 2)]
    duration: u64,
}

fn main() -> Result<()> {
    specfall::logging::init_logging()?;
    let cli = Cli::parse();

    let config = SharedConfig::new(PipelineConfig {
        sample_rate: cli.sample_rate,
        fft_size: cli.fft_size,
        update_interval_ms: cli.interval_ms,
        max_history_size: cli.history,
        min_frequency_hz: cli.min_freq,
        max_frequency_hz: cli.max_freq,
    })?;

    let snapshot = config.get();
    let max_freq = snapshot.max_frequency_hz();
    let scale = TickScale::choose(max_freq - snapshot.min_frequency_hz, DEFAULT_TICK_COUNT);

    let mut pipeline = Pipeline::new(config);
    pipeline.start(Box::new(ToneSource::new(cli.sample_rate, cli.tone, 0.8)))?;

    println!(
        "Analyzing a {} Hz tone at {} sps, fft {} ({} frames)...",
        cli.tone, cli.sample_rate, cli.fft_size, cli.history
    );
    thread::sleep(Duration::from_secs(cli.duration));

    let history = pipeline.history_snapshot();
    let (waveform, write_pos) = pipeline.waveform_snapshot();
    let dominant = pipeline.dominant_frequency_hz();
    pipeline.stop();

    println!("waterfall depth: {} frames", history.len());
    if let Some(frame) = history.first() {
        println!("frame width:     {} bins", frame.len());
    }
    println!(
        "waveform:        {} samples, cursor at {}",
        waveform.len(),
        write_pos
    );
    println!(
        "axis ticks:      every {} Hz (sub-ticks every {} Hz)",
        scale.step, scale.sub_step
    );
    match dominant {
        Some(hz) => println!("dominant:        {hz:.1} Hz"),
        None => println!("dominant:        none (silence)"),
    }

    Ok(())
}
