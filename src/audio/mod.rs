//! Audio side of the pipeline: capture sources, fixed-size blocks, and the
//! per-block statistics window.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → BlockAssembler → SampleBlock → BlockHandler
//!                                                               │
//!                                  BlockStats::compute ◀────────┘
//!                                        │
//!                                        ▼
//!                                   StatWindow (RingBuffer × 2)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use mic_visualizer::audio::{AudioCapture, CaptureSource, SampleBlock};
//! use mic_visualizer::config::AudioConfig;
//!
//! let (tx, rx) = mpsc::sync_channel::<SampleBlock>(2);
//! let capture = AudioCapture::new(&AudioConfig::default()).unwrap();
//! let _handle = capture
//!     .start(move |block: SampleBlock| {
//!         let _ = tx.try_send(block);
//!     })
//!     .unwrap(); // drops handle → stops stream
//!
//! while let Ok(block) = rx.recv() {
//!     println!("block {} with {} samples", block.seq, block.samples.len());
//! }
//! ```

pub mod block;
pub mod buffer;
pub mod capture;
pub mod stats;
pub mod synthetic;

pub use block::{BlockAssembler, BlockHandler, SampleBlock, StreamStatus};
pub use buffer::RingBuffer;
pub use capture::{AudioCapture, CaptureError, CaptureSource, GapDetector, StreamHandle};
pub use stats::{BlockStats, StatWindow};
pub use synthetic::{sine_wave, SyntheticSession, SyntheticSource};
