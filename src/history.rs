//! Waterfall backlog: a bounded, newest-first buffer of spectral frames.
//!
//! Stored as a fixed arena indexed like a ring so that live changes to the
//! history cap never reallocate: the arena only grows when the cap exceeds
//! every previously configured value, and shrinking the cap just trims the
//! effective length.

/// Bounded, insertion-ordered backlog of spectral frames.
///
/// Index 0 of a snapshot is always the most recent frame. The effective
/// length never exceeds the current cap at the end of any operation.
#[derive(Debug)]
pub struct HistoryBuffer {
    /// Arena of frame slots; its length is the largest cap ever configured.
    frames: Vec<Vec<f32>>,
    /// Arena index of the newest frame.
    head: usize,
    /// Number of valid frames reachable from `head`.
    len: usize,
    /// Current cap; at most `frames.len()`.
    max_len: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer capped at `max_len` frames.
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        HistoryBuffer {
            frames: vec![Vec::new(); max_len],
            head: 0,
            len: 0,
            max_len,
        }
    }

    /// Number of frames currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cap.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Inserts `frame` as the newest entry.
    ///
    /// When already at the cap this overwrites the slot holding the oldest
    /// frame, evicting exactly one entry.
    pub fn push(&mut self, frame: Vec<f32>) {
        let capacity = self.frames.len();
        self.head = (self.head + capacity - 1) % capacity;
        self.frames[self.head] = frame;
        if self.len < self.max_len {
            self.len += 1;
        }
    }

    /// Applies a new cap, read fresh from the config each cycle.
    ///
    /// Shrinking below the current length sheds the excess oldest frames
    /// immediately. Growing past the arena size is the one case that
    /// reallocates; growing within it costs nothing.
    pub fn set_max_len(&mut self, max_len: usize) {
        let max_len = max_len.max(1);
        if max_len == self.max_len {
            return;
        }
        if max_len > self.frames.len() {
            // Linearize newest-first into a larger arena.
            let capacity = self.frames.len();
            let mut grown = Vec::with_capacity(max_len);
            for i in 0..self.len {
                grown.push(std::mem::take(&mut self.frames[(self.head + i) % capacity]));
            }
            grown.resize(max_len, Vec::new());
            self.frames = grown;
            self.head = 0;
        }
        self.max_len = max_len;
        if self.len > max_len {
            self.len = max_len;
        }
    }

    /// Owned copy of the backlog, newest first.
    ///
    /// Copy-on-read: the returned frames are detached from the buffer, so
    /// the renderer can hold them while the processing loop keeps pushing.
    pub fn snapshot(&self) -> Vec<Vec<f32>> {
        let capacity = self.frames.len();
        (0..self.len)
            .map(|i| self.frames[(self.head + i) % capacity].clone())
            .collect()
    }

    /// The most recent frame, if any.
    pub fn latest(&self) -> Option<&[f32]> {
        if self.len == 0 {
            None
        } else {
            Some(&self.frames[self.head])
        }
    }
}
