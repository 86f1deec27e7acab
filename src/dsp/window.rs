//! Hann analysis window.

use std::f32::consts::PI;

/// Generates a Hann window of `fft_size` coefficients.
///
/// `w[i] = 0.5 * (1 - cos(2*pi*i / (fft_size - 1)))`, symmetric with zero
/// endpoints. Applied to each frame before the FFT to reduce spectral
/// leakage. Caller guarantees `fft_size >= 2`.
pub fn hann_window(fft_size: usize) -> Vec<f32> {
    (0..fft_size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (fft_size - 1) as f32).cos()))
        .collect()
}

/// Window coefficients cached per FFT size.
///
/// The window is a pure function of `fft_size`, so it is recomputed only
/// when the configured size changes between cycles.
#[derive(Debug, Default)]
pub struct WindowCache {
    size: usize,
    coeffs: Vec<f32>,
}

impl WindowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the window for `fft_size`, recomputing on size change.
    pub fn get(&mut self, fft_size: usize) -> &[f32] {
        if self.size != fft_size {
            self.coeffs = hann_window(fft_size);
            self.size = fft_size;
        }
        &self.coeffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_closed_form_size_4() {
        let w = hann_window(4);
        let expected = [0.0, 0.75, 0.75, 0.0];
        assert_eq!(w.len(), 4);
        for (got, want) in w.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[test]
    fn hann_is_symmetric_with_zero_endpoints() {
        let n = 256;
        let w = hann_window(n);
        assert!(w[0].abs() < 1e-6);
        assert!(w[n - 1].abs() < 1e-6);
        for i in 0..n / 2 {
            assert!((w[i] - w[n - 1 - i]).abs() < 1e-5);
        }
    }

    #[test]
    fn cache_recomputes_only_on_size_change() {
        let mut cache = WindowCache::new();
        let first = cache.get(8).as_ptr();
        let again = cache.get(8).as_ptr();
        assert_eq!(first, again);
        assert_eq!(cache.get(16).len(), 16);
    }
}
