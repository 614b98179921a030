//! The visualizer engine: per-block statistics, sample coloring, and one
//! rendered status line per block.
//!
//! [`Visualizer`] owns the [`StatWindow`] and the output sink.  It has no
//! lifecycle states of its own; every [`Visualizer::on_block`] call appends
//! to the window (evicting the oldest entry when full) and renders.
//!
//! # Example
//!
//! ```rust
//! use mic_visualizer::audio::SampleBlock;
//! use mic_visualizer::config::AppConfig;
//! use mic_visualizer::render::TerminalSink;
//! use mic_visualizer::visualizer::Visualizer;
//!
//! let mut config = AppConfig::default();
//! config.audio.block_size = 4;
//!
//! let mut viz = Visualizer::new(&config, TerminalSink::new(Vec::new()));
//! let stats = viz
//!     .on_block(&SampleBlock::new(0, vec![0.05, -0.2, 0.4, -0.7]))
//!     .unwrap();
//! assert!((stats.peak - 0.7).abs() < 1e-6);
//! assert_eq!(viz.window().len(), 1);
//! ```

use std::io;

use thiserror::Error;

use super::line::{RenderLine, Style};
use super::ColorThresholds;
use crate::audio::{BlockStats, SampleBlock, StatWindow, StreamStatus};
use crate::config::AppConfig;
use crate::render::RenderSink;

// ---------------------------------------------------------------------------
// VisualizerError
// ---------------------------------------------------------------------------

/// Fatal conditions raised while processing a block.
///
/// The size and ordering variants mean the capture source broke its
/// contract; they are programming errors, not runtime conditions.
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error("block {seq} has {got} samples, expected {expected}")]
    BlockSize { seq: u64, expected: usize, got: usize },

    #[error("block {got} delivered after block {last}")]
    OutOfOrder { last: u64, got: u64 },

    #[error("failed to write status line: {0}")]
    Render(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Visualizer
// ---------------------------------------------------------------------------

/// Stateful accumulator + per-call renderer.
pub struct Visualizer<S> {
    thresholds: ColorThresholds,
    block_len: usize,
    display_samples: usize,
    window: StatWindow,
    sink: S,
    last_seq: Option<u64>,
    /// Blocks that arrived with a non-clean [`StreamStatus`].
    flagged: u64,
}

impl<S: RenderSink> Visualizer<S> {
    /// Build an engine for a validated `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config.display.peak_history == 0`; run
    /// [`AppConfig::validate`] first.
    pub fn new(config: &AppConfig, sink: S) -> Self {
        Self {
            thresholds: config.thresholds,
            block_len: config.audio.block_len(),
            display_samples: config.display.display_samples,
            window: StatWindow::new(config.display.peak_history),
            sink,
            last_seq: None,
            flagged: 0,
        }
    }

    /// Process one block: update the window, then render one line.
    ///
    /// Returns the block's own statistics.
    ///
    /// # Errors
    ///
    /// [`VisualizerError::BlockSize`] / [`VisualizerError::OutOfOrder`] when
    /// the block breaks the capture contract (the window is left untouched),
    /// [`VisualizerError::Render`] when the sink fails.
    pub fn on_block(&mut self, block: &SampleBlock) -> Result<BlockStats, VisualizerError> {
        if block.len() != self.block_len {
            return Err(VisualizerError::BlockSize {
                seq: block.seq,
                expected: self.block_len,
                got: block.len(),
            });
        }
        if let Some(last) = self.last_seq {
            if block.seq <= last {
                return Err(VisualizerError::OutOfOrder {
                    last,
                    got: block.seq,
                });
            }
        }
        self.last_seq = Some(block.seq);

        let stats = BlockStats::compute(&block.samples);
        self.window.push(stats);

        if !block.status.is_clean() {
            self.flagged += 1;
            log::debug!("block {} flagged: {:?}", block.seq, block.status);
        }

        let line = self.compose(&block.samples, block.status);
        self.sink.render(&line)?;
        Ok(stats)
    }

    /// Build the status line for `samples` against the current window.
    pub fn compose(&self, samples: &[f32], status: StreamStatus) -> RenderLine {
        let shown = self.display_samples.min(samples.len());
        let mut line = RenderLine::with_capacity(shown * 2 + 6);

        for &sample in &samples[..shown] {
            line.push(
                format!("{sample:+.3}"),
                Style::Level(self.thresholds.classify(sample)),
            );
            line.push(" ", Style::Plain);
        }

        line.push("| ", Style::Plain);
        line.push(format!("Peak:{:.3} ", self.window.avg_peak()), Style::Peak);
        line.push(format!("RMS:{:.3}", self.window.avg_rms()), Style::Rms);

        if status.input_overflow {
            line.push(" !xrun", Style::Warning);
        }
        if status.stream_error {
            line.push(" !err", Style::Warning);
        }
        line
    }

    /// Close out the sink's output.
    pub fn finish(&mut self) -> io::Result<()> {
        self.sink.finish()
    }

    pub fn window(&self) -> &StatWindow {
        &self.window
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Blocks seen with a transient stream condition.
    pub fn flagged_blocks(&self) -> u64 {
        self.flagged
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::ColorTag;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<RenderLine>,
        finished: bool,
    }

    impl RenderSink for Recorder {
        fn render(&mut self, line: &RenderLine) -> io::Result<()> {
            self.lines.push(line.clone());
            Ok(())
        }

        fn finish(&mut self) -> io::Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    struct BrokenPipe;

    impl RenderSink for BrokenPipe {
        fn render(&mut self, _line: &RenderLine) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    fn config(block_size: u32, display_samples: usize, peak_history: usize) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.audio.block_size = block_size;
        cfg.display.display_samples = display_samples;
        cfg.display.peak_history = peak_history;
        cfg
    }

    fn block(seq: u64, samples: &[f32]) -> SampleBlock {
        SampleBlock::new(seq, samples.to_vec())
    }

    #[test]
    fn mixed_block_end_to_end() {
        let mut viz = Visualizer::new(&config(4, 20, 10), Recorder::default());
        let stats = viz.on_block(&block(0, &[0.05, -0.2, 0.4, -0.7])).unwrap();

        assert!((stats.peak - 0.7).abs() < 1e-6);
        assert!((stats.rms - 0.4308).abs() < 1e-4, "rms = {}", stats.rms);

        let line = &viz.sink().lines[0];
        assert_eq!(
            line.levels().collect::<Vec<_>>(),
            vec![ColorTag::Faint, ColorTag::Mild, ColorTag::Strong, ColorTag::Intense]
        );
        assert_eq!(
            line.plain_text(),
            "+0.050 -0.200 +0.400 -0.700 | Peak:0.700 RMS:0.431"
        );
    }

    #[test]
    fn full_scale_blocks_keep_window_at_capacity() {
        let mut viz = Visualizer::new(&config(8, 20, 10), Recorder::default());
        for seq in 0..11 {
            viz.on_block(&block(seq, &[1.0; 8])).unwrap();
        }
        assert_eq!(viz.window().len(), 10);
        assert!((viz.window().avg_peak() - 1.0).abs() < 1e-6);
        assert_eq!(viz.sink().lines.len(), 11);
        assert!(viz.sink().lines[10].plain_text().contains("Peak:1.000"));
    }

    #[test]
    fn silent_block_is_faint_and_zero() {
        let mut viz = Visualizer::new(&config(32, 20, 10), Recorder::default());
        let stats = viz.on_block(&block(0, &[0.0; 32])).unwrap();

        assert_eq!(stats.peak, 0.0);
        assert_eq!(stats.rms, 0.0);
        let line = &viz.sink().lines[0];
        assert_eq!(line.levels().count(), 20);
        assert!(line.levels().all(|t| t == ColorTag::Faint));
        assert!(line.plain_text().ends_with("| Peak:0.000 RMS:0.000"));
    }

    #[test]
    fn display_samples_capped_at_block_length() {
        let mut viz = Visualizer::new(&config(3, 20, 10), Recorder::default());
        viz.on_block(&block(0, &[0.1, 0.2, 0.3])).unwrap();
        assert_eq!(viz.sink().lines[0].levels().count(), 3);
    }

    #[test]
    fn averages_span_the_window() {
        let mut viz = Visualizer::new(&config(2, 0, 2), Recorder::default());
        viz.on_block(&block(0, &[0.2, 0.2])).unwrap();
        viz.on_block(&block(1, &[0.4, 0.4])).unwrap();
        viz.on_block(&block(2, &[0.6, 0.6])).unwrap();

        // Window holds blocks 1 and 2 → mean peak 0.5
        assert!((viz.window().avg_peak() - 0.5).abs() < 1e-6);
        assert_eq!(
            viz.sink().lines[2].plain_text(),
            "| Peak:0.500 RMS:0.500"
        );
    }

    #[test]
    fn wrong_block_size_is_an_invariant_violation() {
        let mut viz = Visualizer::new(&config(4, 20, 10), Recorder::default());
        let err = viz.on_block(&block(0, &[0.0; 3])).unwrap_err();
        assert!(
            matches!(err, VisualizerError::BlockSize { expected: 4, got: 3, .. }),
            "{err}"
        );
        assert!(viz.window().is_empty());
        assert!(viz.sink().lines.is_empty());
    }

    #[test]
    fn replayed_sequence_is_rejected() {
        let mut viz = Visualizer::new(&config(1, 1, 10), Recorder::default());
        viz.on_block(&block(3, &[0.0])).unwrap();
        let err = viz.on_block(&block(3, &[0.0])).unwrap_err();
        assert!(matches!(err, VisualizerError::OutOfOrder { last: 3, got: 3 }));
        assert_eq!(viz.window().len(), 1);
    }

    #[test]
    fn gaps_in_sequence_are_accepted() {
        let mut viz = Visualizer::new(&config(1, 1, 10), Recorder::default());
        viz.on_block(&block(0, &[0.0])).unwrap();
        viz.on_block(&block(5, &[0.0])).unwrap();
        assert_eq!(viz.window().len(), 2);
    }

    #[test]
    fn flagged_status_annotates_line_and_continues() {
        let mut viz = Visualizer::new(&config(1, 1, 10), Recorder::default());
        let mut b = block(0, &[0.5]);
        b.status = StreamStatus::OVERFLOW;
        viz.on_block(&b).unwrap();
        viz.on_block(&block(1, &[0.5])).unwrap();

        assert!(viz.sink().lines[0].plain_text().ends_with(" !xrun"));
        assert!(!viz.sink().lines[1].plain_text().contains('!'));
        assert_eq!(viz.flagged_blocks(), 1);
    }

    #[test]
    fn sink_failure_is_reported() {
        let mut viz = Visualizer::new(&config(1, 1, 10), BrokenPipe);
        let err = viz.on_block(&block(0, &[0.0])).unwrap_err();
        assert!(matches!(err, VisualizerError::Render(_)));
    }

    #[test]
    fn finish_reaches_sink() {
        let mut viz = Visualizer::new(&config(1, 1, 10), Recorder::default());
        viz.finish().unwrap();
        assert!(viz.sink().finished);
    }
}
