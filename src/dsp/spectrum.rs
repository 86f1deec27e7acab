//! Spectral frame construction: magnitude, normalization, frequency zoom.
//!
//! Converts raw FFT output into the normalized magnitude vector a waterfall
//! row is made of. Only the first half of the transform is used; for a real
//! input the upper half mirrors it.

use crate::dsp::fft::Complex;

/// Builds normalized, zoom-clipped magnitude vectors from FFT output.
///
/// Holds a reusable magnitude scratch buffer so steady-state processing
/// does not allocate beyond the output frame itself.
#[derive(Debug, Default)]
pub struct SpectralFrameBuilder {
    magnitudes: Vec<f32>,
}

impl SpectralFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces one spectral frame from the transform of a windowed frame.
    ///
    /// Magnitudes over the non-redundant half `[0, fft_size/2)` are scaled
    /// by the peak so the strongest bin reads exactly 1.0. A silent frame
    /// (zero peak) yields all zeros rather than dividing by zero. The
    /// result is clipped to the `[min_frequency_hz, max_frequency_hz]`
    /// zoom range; the clip always keeps at least one bin.
    pub fn build(
        &mut self,
        spectrum: &[Complex],
        sample_rate: u32,
        min_frequency_hz: f32,
        max_frequency_hz: f32,
    ) -> Vec<f32> {
        let fft_size = spectrum.len();
        let half = fft_size / 2;

        self.magnitudes.clear();
        self.magnitudes.reserve(half);

        let mut peak = 0.0f32;
        for c in &spectrum[..half] {
            let mag = c.norm();
            if mag > peak {
                peak = mag;
            }
            self.magnitudes.push(mag);
        }

        if peak > 0.0 {
            for mag in &mut self.magnitudes {
                *mag /= peak;
            }
        } else {
            // Silent frame: magnitudes are already all zero.
            tracing::trace!("degenerate frame (zero peak magnitude)");
        }

        let bin_width = sample_rate as f32 / fft_size as f32;
        let min_bin = ((min_frequency_hz / bin_width).floor() as usize).min(half - 1);
        let max_bin = ((max_frequency_hz / bin_width).ceil() as usize).clamp(min_bin + 1, half);

        self.magnitudes[min_bin..max_bin].to_vec()
    }
}

/// Index of the strongest bin in a spectral frame, if the frame carries
/// any energy at all.
pub fn peak_bin(frame: &[f32]) -> Option<usize> {
    let (idx, &max) = frame
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
    if max > 0.0 { Some(idx) } else { None }
}
