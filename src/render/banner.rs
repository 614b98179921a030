//! One-time startup banner: title, stream parameters, and color legend.

use std::io::{self, Write};

use crossterm::{queue, style::Print};

use super::sink::queue_styled;
use crate::config::AppConfig;
use crate::visualizer::{ColorTag, Style};

/// Write the banner to `out` and flush.  Colors are only emitted when
/// `styled` is set.
///
/// ```rust
/// use mic_visualizer::config::AppConfig;
/// use mic_visualizer::render::write_banner;
///
/// let mut out = Vec::new();
/// write_banner(&mut out, &AppConfig::default(), false).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("Sample Rate: 44100Hz | Buffer: 1024 samples"));
/// ```
pub fn write_banner<W: Write>(out: &mut W, config: &AppConfig, styled: bool) -> io::Result<()> {
    queue_styled(
        out,
        "Raw Audio Visualizer (Ctrl+C to stop)",
        Style::Title,
        styled,
    )?;
    queue!(
        out,
        Print(format!(
            "\nSample Rate: {}Hz | Buffer: {} samples\nColor Key: ",
            config.audio.sample_rate, config.audio.block_size
        ))
    )?;

    let legend = [ColorTag::Mild, ColorTag::Strong, ColorTag::Intense];
    for (i, tag) in legend.iter().enumerate() {
        if i > 0 {
            queue!(out, Print("/"))?;
        }
        queue_styled(out, tag.label(), Style::Level(*tag), styled)?;
    }

    let t = &config.thresholds;
    queue!(
        out,
        Print(format!(
            " amplitude (>{} / >{} / >{})\n",
            t.low, t.medium, t.high
        ))
    )?;
    out.flush()
}
