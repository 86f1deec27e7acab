//! Audio source abstraction.
//!
//! The pipeline never touches capture devices itself; it pulls mono PCM
//! frames from whatever implements [`AudioSource`]. A capture backend, a
//! file reader, or the synthetic sources below all plug in the same way.
//! Implementors release their underlying resource in `Drop`, so the
//! processing loop dropping the source on any exit path is enough to
//! guarantee cleanup.

use crate::error::Result;

/// Blocking, pull-based supplier of mono 16-bit PCM at a fixed rate.
pub trait AudioSource: Send {
    /// Sample rate the source delivers at, in Hz.
    fn sample_rate(&self) -> u32;

    /// Acquires the underlying resource and begins producing samples.
    ///
    /// # Errors
    /// [`crate::SpecfallError::SourceUnavailable`] if the source cannot be
    /// opened; the pipeline then never starts its loop.
    fn start(&mut self) -> Result<()>;

    /// Fills `buf` with up to `buf.len()` samples, blocking as needed.
    ///
    /// Returns the number of samples actually written. A return smaller
    /// than `buf.len()` is a short read; the caller skips the cycle.
    fn read(&mut self, buf: &mut [i16]) -> usize;

    /// Stops producing samples. Idempotent; also invoked implicitly by
    /// `Drop` in implementors that hold real resources.
    fn stop(&mut self);
}

/// Synthetic pure-tone source, used by the demo binary and tests.
#[derive(Debug)]
pub struct ToneSource {
    sample_rate: u32,
    frequency_hz: f32,
    amplitude: f32,
    position: u64,
    running: bool,
}

impl ToneSource {
    /// `amplitude` is clamped to `[0, 1]` of full scale.
    pub fn new(sample_rate: u32, frequency_hz: f32, amplitude: f32) -> Self {
        ToneSource {
            sample_rate,
            frequency_hz,
            amplitude: amplitude.clamp(0.0, 1.0),
            position: 0,
            running: false,
        }
    }
}

impl AudioSource for ToneSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&mut self) -> Result<()> {
        self.running = true;
        tracing::debug!(
            "tone source started: {} Hz at {} sps",
            self.frequency_hz,
            self.sample_rate
        );
        Ok(())
    }

    fn read(&mut self, buf: &mut [i16]) -> usize {
        if !self.running {
            return 0;
        }
        let step = 2.0 * std::f32::consts::PI * self.frequency_hz / self.sample_rate as f32;
        for slot in buf.iter_mut() {
            let value = (self.position as f32 * step).sin() * self.amplitude;
            *slot = (value * i16::MAX as f32) as i16;
            self.position += 1;
        }
        buf.len()
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// Source backed by a fixed sample buffer; returns a short read once
/// drained. Used in tests for short-read and end-of-stream behavior.
#[derive(Debug)]
pub struct BufferSource {
    sample_rate: u32,
    samples: Vec<i16>,
    position: usize,
}

impl BufferSource {
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Self {
        BufferSource {
            sample_rate,
            samples,
            position: 0,
        }
    }
}

impl AudioSource for BufferSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, buf: &mut [i16]) -> usize {
        let remaining = self.samples.len() - self.position;
        let count = remaining.min(buf.len());
        buf[..count].copy_from_slice(&self.samples[self.position..self.position + count]);
        self.position += count;
        count
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_source_reads_nothing_before_start() {
        let mut source = ToneSource::new(48000, 1000.0, 0.8);
        let mut buf = [0i16; 64];
        assert_eq!(source.read(&mut buf), 0);
        source.start().unwrap();
        assert_eq!(source.read(&mut buf), 64);
    }

    #[test]
    fn tone_source_stays_within_full_scale() {
        let mut source = ToneSource::new(48000, 440.0, 1.0);
        source.start().unwrap();
        let mut buf = [0i16; 4096];
        source.read(&mut buf);
        assert!(buf.iter().any(|&s| s != 0));
    }

    #[test]
    fn buffer_source_short_reads_when_drained() {
        let mut source = BufferSource::new(48000, vec![7i16; 100]);
        source.start().unwrap();
        let mut buf = [0i16; 64];
        assert_eq!(source.read(&mut buf), 64);
        assert_eq!(source.read(&mut buf), 36);
        assert_eq!(source.read(&mut buf), 0);
    }
}
