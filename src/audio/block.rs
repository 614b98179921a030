//! Fixed-size sample blocks and the handler contract between a capture
//! source and its consumer.
//!
//! Audio backends deliver buffers of whatever size they like.  The
//! [`BlockAssembler`] re-chunks that stream into [`SampleBlock`]s of exactly
//! `block_size` samples, numbered in capture order, so consumers can rely on
//! the fixed-size contract.
//!
//! # Example
//!
//! ```rust
//! use mic_visualizer::audio::BlockAssembler;
//!
//! let mut assembler = BlockAssembler::new(4);
//! let mut blocks = Vec::new();
//! assembler.push(&[0.1, 0.2, 0.3], |b| blocks.push(b));
//! assert!(blocks.is_empty()); // 3 of 4 samples so far
//!
//! assembler.push(&[0.4, 0.5], |b| blocks.push(b));
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].samples, vec![0.1, 0.2, 0.3, 0.4]);
//! assert_eq!(blocks[0].seq, 0);
//! ```

// ---------------------------------------------------------------------------
// StreamStatus
// ---------------------------------------------------------------------------

/// Non-fatal conditions reported alongside a block.
///
/// A consumer may annotate its output when a flag is set but must keep
/// processing subsequent blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStatus {
    /// Input was lost before this block: the device skipped ahead, or the
    /// consumer could not keep up and an earlier block was dropped.
    pub input_overflow: bool,
    /// The backend reported a stream error since the previous block.
    pub stream_error: bool,
}

impl StreamStatus {
    /// Status with the overflow flag set.
    pub const OVERFLOW: Self = Self {
        input_overflow: true,
        stream_error: false,
    };

    /// Status with the stream-error flag set.
    pub const STREAM_ERROR: Self = Self {
        input_overflow: false,
        stream_error: true,
    };

    /// Returns `true` when no flag is set.
    pub fn is_clean(&self) -> bool {
        !self.input_overflow && !self.stream_error
    }

    /// Union of both statuses.
    pub fn merge(&mut self, other: StreamStatus) {
        self.input_overflow |= other.input_overflow;
        self.stream_error |= other.stream_error;
    }
}

// ---------------------------------------------------------------------------
// SampleBlock
// ---------------------------------------------------------------------------

/// One fixed-length chunk of mono `f32` samples in `[-1.0, 1.0]`.
///
/// Ownership moves from the capture source to the handler; nothing retains
/// the block once the handler is done with it.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBlock {
    /// Capture order, starting at 0 for the first block of a session.
    pub seq: u64,
    /// Exactly `block_size` mono samples.
    pub samples: Vec<f32>,
    /// Transient conditions observed while this block was captured.
    pub status: StreamStatus,
}

impl SampleBlock {
    /// Build a clean block.
    pub fn new(seq: u64, samples: Vec<f32>) -> Self {
        Self {
            seq,
            samples,
            status: StreamStatus::default(),
        }
    }

    /// Number of samples in the block.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` for a zero-length block.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// BlockHandler
// ---------------------------------------------------------------------------

/// Per-block callback registered with a capture source.
///
/// Invoked once per block, in capture order, on the source's delivery
/// thread.  Implementations run in a real-time context and must return
/// quickly: no blocking I/O and no waiting on contended locks.
pub trait BlockHandler: Send {
    fn on_block(&mut self, block: SampleBlock);
}

impl<F> BlockHandler for F
where
    F: FnMut(SampleBlock) + Send,
{
    fn on_block(&mut self, block: SampleBlock) {
        self(block)
    }
}

// ---------------------------------------------------------------------------
// BlockAssembler
// ---------------------------------------------------------------------------

/// Re-chunks an arbitrary-sized sample stream into exact-size blocks.
pub struct BlockAssembler {
    block_size: usize,
    pending: Vec<f32>,
    next_seq: u64,
    /// Flags accumulated for the block currently being filled.
    status: StreamStatus,
}

impl BlockAssembler {
    /// Create an assembler producing blocks of `block_size` samples.
    ///
    /// # Panics
    ///
    /// Panics if `block_size == 0`.
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be > 0");
        Self {
            block_size,
            pending: Vec::with_capacity(block_size),
            next_seq: 0,
            status: StreamStatus::default(),
        }
    }

    /// Attach `status` to the block currently being filled.
    pub fn flag(&mut self, status: StreamStatus) {
        self.status.merge(status);
    }

    /// Feed `data`, calling `emit` for every block completed along the way.
    ///
    /// Samples left over after the last complete block are kept for the next
    /// call, so the concatenation of emitted blocks is exactly the input
    /// stream with nothing skipped or repeated.
    pub fn push<F: FnMut(SampleBlock)>(&mut self, mut data: &[f32], mut emit: F) {
        while !data.is_empty() {
            let take = (self.block_size - self.pending.len()).min(data.len());
            self.pending.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.pending.len() == self.block_size {
                let samples = std::mem::replace(
                    &mut self.pending,
                    Vec::with_capacity(self.block_size),
                );
                emit(SampleBlock {
                    seq: self.next_seq,
                    samples,
                    status: std::mem::take(&mut self.status),
                });
                self.next_seq += 1;
            }
        }
    }

    /// Samples waiting for the current block to fill up.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of blocks emitted so far.
    pub fn blocks_emitted(&self) -> u64 {
        self.next_seq
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
