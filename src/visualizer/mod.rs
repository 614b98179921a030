//! Visualizer engine: amplitude classification, statistics window
//! maintenance, and status-line composition.
//!
//! ```text
//! SampleBlock ──▶ Visualizer::on_block
//!                   ├─ BlockStats::compute      → StatWindow::push
//!                   ├─ ColorThresholds::classify (first DISPLAY_SAMPLES)
//!                   └─ RenderLine               → RenderSink::render
//! ```

pub mod color;
pub mod engine;
pub mod line;

pub use color::{ColorTag, ColorThresholds};
pub use engine::{Visualizer, VisualizerError};
pub use line::{RenderLine, Segment, Style};
