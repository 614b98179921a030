//! Pipeline wiring between the capture source and the visualizer.
//!
//! # Architecture
//!
//! ```text
//! CaptureSource (cpal / synthetic)
//!        │  BlockHandler::on_block        ← real-time context, never blocks
//!        ▼
//! RenderHandoff ──try_send──▶ bounded(queue_depth)
//!                                  │
//!                                  ▼
//! RenderThread ("render")  Visualizer::on_block → RenderSink
//! ```
//!
//! The statistics window lives on the render thread only.  Rendered lines
//! follow capture order; when the queue is full the oldest queued block is
//! evicted and the incoming one is flagged as an overflow.
//!
//! # Quick start
//!
//! ```rust
//! use mic_visualizer::audio::{CaptureSource, SyntheticSource};
//! use mic_visualizer::config::AppConfig;
//! use mic_visualizer::pipeline::RenderThread;
//! use mic_visualizer::render::LogSink;
//! use mic_visualizer::visualizer::Visualizer;
//!
//! let config = AppConfig::default();
//! let viz = Visualizer::new(&config, LogSink);
//! let (handoff, render) = RenderThread::spawn(viz, config.display.queue_depth).unwrap();
//!
//! let session = SyntheticSource::new(&config.audio, |_: u64, out: &mut [f32]| out.fill(0.25))
//!     .unwrap()
//!     .with_limit(4)
//!     .start(handoff)
//!     .unwrap();
//! session.join().unwrap();
//!
//! let summary = render.join().unwrap();
//! assert_eq!(summary.rendered + summary.dropped, 4);
//! ```

pub mod handoff;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use handoff::{handoff, RenderHandoff};
pub use runner::{PipelineError, RenderSummary, RenderThread};
