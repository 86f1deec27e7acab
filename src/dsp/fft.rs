//! Radix-2 decimation-in-time FFT.
//!
//! Iterative Cooley-Tukey with an initial bit-reversal permutation, operating
//! in place on a caller-owned buffer so the hot path allocates nothing.
//! Twiddle factors are computed with `cos`/`sin` per butterfly; at the
//! single precision used throughout the pipeline a precomputed table buys
//! nothing measurable.

use std::f32::consts::PI;
use std::ops::{Add, Mul, Sub};

use crate::error::{Result, SpecfallError};

/// Complex number in single precision. Plain value type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub fn new(re: f32, im: f32) -> Self {
        Complex { re, im }
    }

    /// Constructs `r * e^(i*theta)`.
    pub fn polar(r: f32, theta: f32) -> Self {
        Complex {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    /// Magnitude, `sqrt(re^2 + im^2)`.
    pub fn norm(self) -> f32 {
        (self.re * self.re + self.im * self.im).sqrt()
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, other: Complex) -> Complex {
        Complex::new(self.re + other.re, self.im + other.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, other: Complex) -> Complex {
        Complex::new(self.re - other.re, self.im - other.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, other: Complex) -> Complex {
        Complex::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }
}

/// Forward FFT of a fixed, power-of-two size.
///
/// The size is validated once at construction; `process` then only checks
/// that the supplied buffer matches.
#[derive(Debug, Clone)]
pub struct FftEngine {
    size: usize,
}

impl FftEngine {
    /// Creates an engine for transforms of length `size`.
    ///
    /// # Errors
    /// Returns [`SpecfallError::InvalidSize`] if `size` is zero or not a
    /// power of two.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(SpecfallError::InvalidSize(size));
        }
        Ok(FftEngine { size })
    }

    /// Transform length this engine was planned for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Computes the DFT of `buffer` in place.
    ///
    /// # Errors
    /// Returns [`SpecfallError::SizeMismatch`] if `buffer.len()` differs
    /// from the engine size.
    pub fn process(&self, buffer: &mut [Complex]) -> Result<()> {
        if buffer.len() != self.size {
            return Err(SpecfallError::SizeMismatch {
                expected: self.size,
                got: buffer.len(),
            });
        }

        let n = self.size;
        if n == 1 {
            // Length-1 transform is the identity.
            return Ok(());
        }

        // Reorder into bit-reversed index order so the butterflies below can
        // combine adjacent blocks in place.
        let bits = n.trailing_zeros();
        for i in 0..n {
            let j = i.reverse_bits() >> (usize::BITS - bits);
            if i < j {
                buffer.swap(i, j);
            }
        }

        // Bottom-up butterfly passes: blocks of 2, then 4, ... up to n.
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let angle_step = -2.0 * PI / len as f32;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let w = Complex::polar(1.0, angle_step * k as f32);
                    let even = buffer[start + k];
                    let odd = w * buffer[start + k + half];
                    buffer[start + k] = even + odd;
                    buffer[start + k + half] = even - odd;
                }
            }
            len *= 2;
        }

        Ok(())
    }

    /// Loads a real signal into `out` and transforms it in place.
    ///
    /// This is the variant the pipeline uses each cycle: `out` is a
    /// pre-allocated scratch buffer reused across cycles.
    pub fn process_real(&self, signal: &[f32], out: &mut [Complex]) -> Result<()> {
        if signal.len() != self.size {
            return Err(SpecfallError::SizeMismatch {
                expected: self.size,
                got: signal.len(),
            });
        }
        if out.len() != self.size {
            return Err(SpecfallError::SizeMismatch {
                expected: self.size,
                got: out.len(),
            });
        }
        for (slot, &s) in out.iter_mut().zip(signal.iter()) {
            *slot = Complex::new(s, 0.0);
        }
        self.process(out)
    }

    /// Allocating convenience wrapper around [`FftEngine::process_real`].
    pub fn transform(&self, signal: &[f32]) -> Result<Vec<Complex>> {
        let mut out = vec![Complex::ZERO; self.size];
        self.process_real(signal, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    /// Direct O(n^2) DFT in f64, the definition the engine must match.
    fn dft_reference(signal: &[f32]) -> Vec<(f64, f64)> {
        let n = signal.len();
        (0..n)
            .map(|k| {
                let mut re = 0.0f64;
                let mut im = 0.0f64;
                for (t, &x) in signal.iter().enumerate() {
                    let angle = -2.0 * std::f64::consts::PI * (k * t) as f64 / n as f64;
                    re += x as f64 * angle.cos();
                    im += x as f64 * angle.sin();
                }
                (re, im)
            })
            .collect()
    }

    /// Deterministic but unstructured test signal.
    fn test_signal(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| ((i * 7919 + 13) % 1000) as f32 / 500.0 - 1.0)
            .collect()
    }

    fn assert_matches_reference(signal: &[f32]) {
        let n = signal.len();
        let engine = FftEngine::new(n).unwrap();
        let out = engine.transform(signal).unwrap();
        let reference = dft_reference(signal);

        let scale = reference
            .iter()
            .map(|&(re, im)| (re * re + im * im).sqrt())
            .fold(1.0f64, f64::max);

        for (k, (c, &(re, im))) in out.iter().zip(reference.iter()).enumerate() {
            let err_re = (c.re as f64 - re).abs() / scale;
            let err_im = (c.im as f64 - im).abs() / scale;
            assert!(
                err_re < 1e-3 && err_im < 1e-3,
                "bin {k} of n={n}: got ({}, {}), reference ({re}, {im})",
                c.re,
                c.im
            );
        }
    }

    #[test]
    fn matches_direct_dft() {
        for n in [2, 4, 8, 16, 256] {
            assert_matches_reference(&test_signal(n));
        }
    }

    #[test]
    fn matches_rustfft() {
        let n = 512;
        let signal = test_signal(n);

        let engine = FftEngine::new(n).unwrap();
        let ours = engine.transform(&signal).unwrap();

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let mut theirs: Vec<rustfft::num_complex::Complex<f32>> = signal
            .iter()
            .map(|&s| rustfft::num_complex::Complex::new(s, 0.0))
            .collect();
        fft.process(&mut theirs);

        let scale = theirs.iter().map(|c| c.norm()).fold(1.0f32, f32::max);
        for (a, b) in ours.iter().zip(theirs.iter()) {
            assert!((a.re - b.re).abs() / scale < 1e-3);
            assert!((a.im - b.im).abs() / scale < 1e-3);
        }
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(matches!(
            FftEngine::new(100),
            Err(SpecfallError::InvalidSize(100))
        ));
        assert!(matches!(
            FftEngine::new(0),
            Err(SpecfallError::InvalidSize(0))
        ));
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let engine = FftEngine::new(8).unwrap();
        let mut buffer = vec![Complex::ZERO; 4];
        assert!(matches!(
            engine.process(&mut buffer),
            Err(SpecfallError::SizeMismatch {
                expected: 8,
                got: 4
            })
        ));
    }

    #[test]
    fn length_one_is_identity() {
        let engine = FftEngine::new(1).unwrap();
        let out = engine.transform(&[3.5]).unwrap();
        assert_eq!(out, vec![Complex::new(3.5, 0.0)]);
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let engine = FftEngine::new(8).unwrap();
        let mut signal = vec![0.0f32; 8];
        signal[0] = 1.0;
        let out = engine.transform(&signal).unwrap();
        for c in out {
            assert!((c.re - 1.0).abs() < 1e-6);
            assert!(c.im.abs() < 1e-6);
        }
    }
}
