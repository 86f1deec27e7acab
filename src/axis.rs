//! Frequency-axis mapping and gridline placement.
//!
//! Pure bin/Hz conversion plus "nice number" tick-step selection so axis
//! gridlines land on round frequencies. Deterministic: identical inputs
//! always produce identical ticks, keeping gridlines stable across renders.

/// Default number of major gridlines to aim for across the visible range.
pub const DEFAULT_TICK_COUNT: usize = 8;

/// Tolerance in Hz when deciding whether a sub-tick coincides with a major
/// tick and should be suppressed.
const TICK_COINCIDENCE_EPS: f32 = 0.01;

/// Maps transform bins to frequencies and back for a fixed
/// `(sample_rate, fft_size)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyAxisMapper {
    sample_rate: u32,
    fft_size: usize,
}

impl FrequencyAxisMapper {
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        FrequencyAxisMapper {
            sample_rate,
            fft_size,
        }
    }

    /// Width of one bin in Hz: `sample_rate / fft_size`.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Highest representable frequency, `sample_rate / 2`.
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Bin index containing frequency `hz`.
    pub fn bin_for_frequency(&self, hz: f32) -> usize {
        (hz / self.bin_width()).floor() as usize
    }

    /// Center frequency of bin `bin`.
    pub fn frequency_for_bin(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_width()
    }

    /// Tick scale for the given zoom range with the default tick count.
    pub fn tick_scale(&self, min_hz: f32, max_hz: f32) -> TickScale {
        TickScale::choose(max_hz - min_hz, DEFAULT_TICK_COUNT)
    }
}

/// A chosen gridline spacing: major step and the step/5 sub-step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickScale {
    pub step: f32,
    pub sub_step: f32,
}

impl TickScale {
    /// Chooses a "nice" step for labeling `range_hz` with roughly
    /// `ideal_tick_count` gridlines.
    ///
    /// The raw step `range / ideal` is snapped to the nearest of
    /// `{1, 2, 5} * 10^floor(log10(raw))`.
    pub fn choose(range_hz: f32, ideal_tick_count: usize) -> Self {
        let raw = range_hz / ideal_tick_count as f32;
        let base = 10.0f32.powf(raw.log10().floor());
        let step = [1.0, 2.0, 5.0]
            .into_iter()
            .map(|m| m * base)
            .min_by(|a, b| (raw - a).abs().total_cmp(&(raw - b).abs()))
            .unwrap_or(raw);
        TickScale {
            step,
            sub_step: step / 5.0,
        }
    }

    /// Major tick frequencies inside `[min_hz, max_hz]`, in ascending order.
    pub fn major_ticks(&self, min_hz: f32, max_hz: f32) -> Vec<f32> {
        let first = (min_hz / self.step).floor() as i64;
        let last = (max_hz / self.step).ceil() as i64;
        (first..=last)
            .map(|i| i as f32 * self.step)
            .filter(|&hz| hz >= min_hz && hz <= max_hz)
            .collect()
    }

    /// Sub-tick frequencies inside `[min_hz, max_hz]`, skipping positions
    /// that coincide with a major tick.
    pub fn sub_ticks(&self, min_hz: f32, max_hz: f32) -> Vec<f32> {
        let first = (min_hz / self.sub_step).floor() as i64;
        let last = (max_hz / self.sub_step).ceil() as i64;
        (first..=last)
            .map(|i| i as f32 * self.sub_step)
            .filter(|&hz| hz >= min_hz && hz <= max_hz)
            .filter(|&hz| {
                let nearest_major = (hz / self.step).round() * self.step;
                (hz - nearest_major).abs() >= TICK_COINCIDENCE_EPS
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_step_snaps_to_thousand() {
        // raw = 9750 / 8 = 1218.75; candidates 1000/2000/5000
        let scale = TickScale::choose(9750.0, 8);
        assert_eq!(scale.step, 1000.0);
        assert_eq!(scale.sub_step, 200.0);
    }

    #[test]
    fn nice_step_snaps_to_five() {
        // raw = 47 / 8 = 5.875; candidates 1/2/5
        let scale = TickScale::choose(47.0, 8);
        assert_eq!(scale.step, 5.0);
        assert_eq!(scale.sub_step, 1.0);
    }

    #[test]
    fn bin_frequency_round_trip() {
        let mapper = FrequencyAxisMapper::new(48000, 512);
        assert_eq!(mapper.bin_width(), 93.75);
        assert_eq!(mapper.nyquist(), 24000.0);
        assert_eq!(mapper.bin_for_frequency(1000.0), 10);
        assert_eq!(mapper.frequency_for_bin(10), 937.5);
        // frequency_for_bin(bin_for_frequency(hz)) stays within one bin
        for hz in [0.0, 93.75, 440.0, 1000.0, 23999.0] {
            let back = mapper.frequency_for_bin(mapper.bin_for_frequency(hz));
            assert!((back - hz).abs() < mapper.bin_width());
        }
    }

    #[test]
    fn major_ticks_cover_range() {
        let scale = TickScale::choose(10000.0, 8);
        assert_eq!(scale.step, 1000.0);
        let ticks = scale.major_ticks(0.0, 10000.0);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[10], 10000.0);
    }

    #[test]
    fn major_ticks_respect_offset_range() {
        let scale = TickScale { step: 1000.0, sub_step: 200.0 };
        let ticks = scale.major_ticks(250.0, 3100.0);
        assert_eq!(ticks, vec![1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn sub_ticks_skip_major_positions() {
        let scale = TickScale { step: 1000.0, sub_step: 200.0 };
        let subs = scale.sub_ticks(0.0, 2000.0);
        assert!(subs.iter().all(|&hz| hz % 1000.0 != 0.0));
        assert!(subs.contains(&200.0));
        assert!(subs.contains(&1800.0));
        assert_eq!(subs.len(), 8);
    }

    #[test]
    fn ticks_are_deterministic() {
        let a = TickScale::choose(9750.0, 8).major_ticks(0.0, 9750.0);
        let b = TickScale::choose(9750.0, 8).major_ticks(0.0, 9750.0);
        assert_eq!(a, b);
    }
}
