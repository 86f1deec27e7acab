//! Time-domain waveform ring buffer.
//!
//! Fixed-capacity circular storage for the raw normalized samples feeding
//! the waveform display. New samples overwrite the oldest in circular
//! order; the consumer reconstructs chronological order from the write
//! cursor.

/// Number of samples retained for the waveform display.
pub const WAVEFORM_CAPACITY: usize = 1024;

/// Fixed-capacity circular buffer of samples in `[-1, 1]`.
#[derive(Debug)]
pub struct WaveformRingBuffer {
    samples: Vec<f32>,
    write_pos: usize,
}

impl Default for WaveformRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveformRingBuffer {
    /// Creates a buffer with the standard display capacity.
    pub fn new() -> Self {
        Self::with_capacity(WAVEFORM_CAPACITY)
    }

    /// Creates a buffer with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        WaveformRingBuffer {
            samples: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Position the next sample will be written to.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Appends `samples`, wrapping past the end of the buffer.
    ///
    /// Works for writes smaller or larger than the capacity; a write of
    /// more than `capacity` samples simply leaves the last `capacity` of
    /// them in place.
    pub fn write(&mut self, samples: &[f32]) {
        let capacity = self.samples.len();
        for (i, &sample) in samples.iter().enumerate() {
            self.samples[(self.write_pos + i) % capacity] = sample;
        }
        self.write_pos = (self.write_pos + samples.len()) % capacity;
    }

    /// Owned copy of the buffer plus the current write cursor.
    ///
    /// The oldest sample lives at `write_pos`; reading `capacity` samples
    /// forward from there (wrapping) yields chronological order.
    pub fn snapshot(&self) -> (Vec<f32>, usize) {
        (self.samples.clone(), self.write_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_wraps_past_capacity() {
        let cap = 16;
        let mut ring = WaveformRingBuffer::with_capacity(cap);
        let samples: Vec<f32> = (0..cap + 3).map(|i| i as f32).collect();
        ring.write(&samples);

        // Equivalent to a full fill followed by 3 samples from position 0.
        let mut expected = WaveformRingBuffer::with_capacity(cap);
        expected.write(&samples[..cap]);
        expected.write(&samples[cap..]);

        let (got, got_pos) = ring.snapshot();
        let (want, want_pos) = expected.snapshot();
        assert_eq!(got, want);
        assert_eq!(got_pos, want_pos);
        assert_eq!(got_pos, 3);
        // First three slots were overwritten by the wrapped tail.
        assert_eq!(&got[..3], &[16.0, 17.0, 18.0]);
        assert_eq!(got[3], 3.0);
    }

    #[test]
    fn write_larger_than_capacity_keeps_tail() {
        let cap = 8;
        let mut ring = WaveformRingBuffer::with_capacity(cap);
        let samples: Vec<f32> = (0..3 * cap + 1).map(|i| i as f32).collect();
        ring.write(&samples);

        let (buf, pos) = ring.snapshot();
        assert_eq!(pos, 1);
        // Chronological read from pos covers the last `cap` samples written.
        let chronological: Vec<f32> = (0..cap).map(|i| buf[(pos + i) % cap]).collect();
        let expected: Vec<f32> = (2 * cap + 1..3 * cap + 1).map(|i| i as f32).collect();
        assert_eq!(chronological, expected);
    }

    #[test]
    fn partial_writes_advance_cursor() {
        let mut ring = WaveformRingBuffer::with_capacity(8);
        ring.write(&[1.0, 2.0, 3.0]);
        assert_eq!(ring.write_pos(), 3);
        ring.write(&[4.0, 5.0]);
        assert_eq!(ring.write_pos(), 5);
        let (buf, _) = ring.snapshot();
        assert_eq!(&buf[..5], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&buf[5..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn default_capacity_is_1024() {
        assert_eq!(WaveformRingBuffer::new().capacity(), WAVEFORM_CAPACITY);
    }
}
