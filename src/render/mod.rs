//! Rendering: the [`RenderSink`] abstraction, its terminal and log
//! implementations, and the startup banner.

pub mod banner;
pub mod sink;

pub use banner::write_banner;
pub use sink::{terminal_style, LogSink, RenderSink, TerminalSink};
