//! Pull-based audio sample buffer.
//!
//! The scheduler pushes one sample per audio tick; the host drains them
//! whenever it likes. If the host falls behind, the oldest samples go.

use std::collections::VecDeque;

/// Samples kept before the oldest are discarded (about 0.7 s at 44.1 kHz).
pub const AUDIO_BUFFER_CAPACITY: usize = 32_768;

/// Format of the samples handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u8,
}

/// Mono signed 16-bit sample FIFO.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: VecDeque<i16>,
    dropped: u64,
}

impl AudioBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(AUDIO_BUFFER_CAPACITY),
            dropped: 0,
        }
    }

    pub fn push(&mut self, sample: i16) {
        if self.samples.len() == AUDIO_BUFFER_CAPACITY {
            self.samples.pop_front();
            self.dropped += 1;
        }
        self.samples.push_back(sample);
    }

    /// Move up to `out.len()` samples into `out`, oldest first. Returns how
    /// many were written.
    pub fn drain_into(&mut self, out: &mut [i16]) -> usize {
        let count = out.len().min(self.samples.len());
        for (slot, sample) in out.iter_mut().zip(self.samples.drain(..count)) {
            *slot = sample;
        }
        count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples discarded because the host did not drain in time.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Output level for the 6-bit DAC. The DAC is only heard while PIA1 CB2
/// (sound enable) is high.
#[must_use]
pub fn dac_sample(dac: u8, enabled: bool) -> i16 {
    if enabled {
        i16::from(dac & 0x3F) << 9
    } else {
        0
    }
}
