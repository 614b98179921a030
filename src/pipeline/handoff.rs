//! Bounded, non-blocking handoff from the audio callback to the render
//! thread.
//!
//! [`RenderHandoff`] is the [`BlockHandler`] registered with the capture
//! source.  It never waits: when the queue is full the oldest queued block
//! is evicted and counted, so the render thread always sees the most recent
//! audio.  The block that takes its place carries
//! [`StreamStatus::input_overflow`] along with any flags of the evicted one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::audio::{BlockHandler, SampleBlock, StreamStatus};

/// Create a handoff with room for `depth` pending blocks.
///
/// # Panics
///
/// Panics if `depth == 0` (a rendezvous channel would block the audio
/// thread until the render thread is ready).
pub fn handoff(depth: usize) -> (RenderHandoff, Receiver<SampleBlock>) {
    assert!(depth > 0, "render queue depth must be > 0");
    let (tx, rx) = bounded(depth);
    (
        RenderHandoff {
            tx,
            evict: rx.clone(),
            dropped: Arc::new(AtomicU64::new(0)),
        },
        rx,
    )
}

/// Producer half of the render queue.
pub struct RenderHandoff {
    tx: Sender<SampleBlock>,
    /// Producer-side receiver used only to discard the oldest block.
    evict: Receiver<SampleBlock>,
    dropped: Arc<AtomicU64>,
}

impl RenderHandoff {
    /// Shared counter of blocks evicted from a full queue.
    pub fn dropped_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }
}

impl BlockHandler for RenderHandoff {
    fn on_block(&mut self, mut block: SampleBlock) {
        loop {
            match self.tx.try_send(block) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    block = rejected;
                    // Empty here means the render thread just took one.
                    if let Ok(stale) = self.evict.try_recv() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        block.status.merge(stale.status);
                        block.status.merge(StreamStatus::OVERFLOW);
                    }
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
