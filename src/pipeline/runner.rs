//! Render thread: owns the [`Visualizer`] and its [`StatWindow`] and drains
//! the handoff queue in capture order.
//!
//! ```text
//! audio callback ──RenderHandoff::on_block──▶ bounded(depth)
//!                                                   │
//!                                  "render" thread  ▼
//!                              Visualizer::on_block ─▶ RenderSink
//! ```
//!
//! The thread ends when every sender is gone (capture stopped) or when the
//! visualizer reports a fatal error.
//!
//! [`StatWindow`]: crate::audio::StatWindow

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use thiserror::Error;

use super::handoff::{handoff, RenderHandoff};
use crate::audio::SampleBlock;
use crate::render::RenderSink;
use crate::visualizer::{Visualizer, VisualizerError};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Visualizer(#[from] VisualizerError),

    #[error("render thread panicked")]
    Panicked,
}

// ---------------------------------------------------------------------------
// RenderSummary
// ---------------------------------------------------------------------------

/// Counters reported when the render thread exits cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Blocks rendered.
    pub rendered: u64,
    /// Rendered blocks that carried a transient stream condition.
    pub flagged: u64,
    /// Blocks evicted from a full queue before reaching the render thread.
    pub dropped: u64,
}

// ---------------------------------------------------------------------------
// RenderThread
// ---------------------------------------------------------------------------

/// Handle to the spawned render thread.
pub struct RenderThread {
    handle: JoinHandle<Result<RenderSummary, VisualizerError>>,
    dropped: Arc<AtomicU64>,
}

impl RenderThread {
    /// Move `visualizer` onto a new thread fed by a queue of `depth` blocks.
    ///
    /// Returns the producer half to register with a capture source.
    pub fn spawn<S>(
        visualizer: Visualizer<S>,
        depth: usize,
    ) -> std::io::Result<(RenderHandoff, RenderThread)>
    where
        S: RenderSink + Send + 'static,
    {
        let (tx, rx) = handoff(depth);
        let dropped = tx.dropped_counter();

        let handle = thread::Builder::new()
            .name("render".into())
            .spawn(move || run(visualizer, rx))?;

        Ok((tx, RenderThread { handle, dropped }))
    }

    /// `true` once the thread has exited, e.g. after a fatal error.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the thread to drain and exit.
    ///
    /// Only returns once every [`RenderHandoff`] has been dropped or the
    /// thread has failed.
    pub fn join(self) -> Result<RenderSummary, PipelineError> {
        let mut summary = self
            .handle
            .join()
            .map_err(|_| PipelineError::Panicked)??;
        summary.dropped = self.dropped.load(Ordering::Relaxed);
        Ok(summary)
    }
}

fn run<S: RenderSink>(
    mut visualizer: Visualizer<S>,
    rx: Receiver<SampleBlock>,
) -> Result<RenderSummary, VisualizerError> {
    let outcome = drain(&mut visualizer, rx);
    // End the status line even when bailing out, so the error message that
    // follows starts on its own line.
    let finished = visualizer.finish();

    if let Err(e) = &outcome {
        log::error!("render thread stopping: {e}");
    }
    let rendered = outcome?;
    finished?;

    Ok(RenderSummary {
        rendered,
        flagged: visualizer.flagged_blocks(),
        dropped: 0,
    })
}

fn drain<S: RenderSink>(
    visualizer: &mut Visualizer<S>,
    rx: Receiver<SampleBlock>,
) -> Result<u64, VisualizerError> {
    let mut rendered = 0;
    for block in rx {
        visualizer.on_block(&block)?;
        rendered += 1;
    }
    Ok(rendered)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
