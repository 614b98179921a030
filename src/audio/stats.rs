//! Per-block amplitude statistics and their sliding-window history.
//!
//! [`BlockStats`] reduces one block to its peak and RMS amplitude.
//! [`StatWindow`] keeps the most recent `history` of those values in two
//! parallel [`RingBuffer`]s and reports their running means.
//!
//! # Example
//!
//! ```rust
//! use mic_visualizer::audio::{BlockStats, StatWindow};
//!
//! let stats = BlockStats::compute(&[0.05, -0.2, 0.4, -0.7]);
//! assert!((stats.peak - 0.7).abs() < 1e-6);
//! assert!((stats.rms - 0.4308).abs() < 1e-4);
//!
//! let mut window = StatWindow::new(10);
//! window.push(stats);
//! assert_eq!(window.len(), 1);
//! ```

use super::RingBuffer;

// ---------------------------------------------------------------------------
// BlockStats
// ---------------------------------------------------------------------------

/// Peak and RMS amplitude of a single block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockStats {
    /// Maximum absolute sample value.
    pub peak: f32,
    /// Root-mean-square amplitude.
    pub rms: f32,
}

impl BlockStats {
    /// Compute peak and RMS over `samples`.
    ///
    /// An empty slice yields zeros.  The sum of squares is accumulated in
    /// `f64` so long blocks do not lose precision.
    pub fn compute(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut peak = 0.0_f32;
        let mut sum_sq = 0.0_f64;
        for &s in samples {
            peak = peak.max(s.abs());
            sum_sq += f64::from(s) * f64::from(s);
        }
        let rms = (sum_sq / samples.len() as f64).sqrt() as f32;

        Self { peak, rms }
    }
}

// ---------------------------------------------------------------------------
// StatWindow
// ---------------------------------------------------------------------------

/// Bounded history of the most recent block statistics.
///
/// Both histories are always the same length, never longer than the
/// configured capacity; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct StatWindow {
    peaks: RingBuffer<f32>,
    rms: RingBuffer<f32>,
}

impl StatWindow {
    /// Create an empty window holding at most `history` entries.
    ///
    /// # Panics
    ///
    /// Panics if `history == 0`.
    pub fn new(history: usize) -> Self {
        Self {
            peaks: RingBuffer::new(history),
            rms: RingBuffer::new(history),
        }
    }

    /// Record one block's statistics, evicting the oldest entry when full.
    pub fn push(&mut self, stats: BlockStats) {
        self.peaks.push(stats.peak);
        self.rms.push(stats.rms);
    }

    /// Mean of the peak history, `0.0` when empty.
    pub fn avg_peak(&self) -> f32 {
        mean(&self.peaks)
    }

    /// Mean of the RMS history, `0.0` when empty.
    pub fn avg_rms(&self) -> f32 {
        mean(&self.rms)
    }

    /// Peak history, oldest first.
    pub fn peaks(&self) -> impl Iterator<Item = f32> + '_ {
        self.peaks.iter()
    }

    /// RMS history, oldest first.
    pub fn rms_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.rms.iter()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.peaks.capacity()
    }
}

fn mean(values: &RingBuffer<f32>) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
