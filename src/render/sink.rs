//! Output sinks for rendered status lines.
//!
//! [`TerminalSink`] writes the status line to a terminal or a pipe. On a
//! terminal it overwrites a single line in place using `crossterm` styling;
//! in plain mode every line is written unstyled and newline-terminated.
//! [`LogSink`] forwards the unstyled text to the `log` facade instead.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::visualizer::{ColorTag, RenderLine, Style};

// ---------------------------------------------------------------------------
// RenderSink
// ---------------------------------------------------------------------------

/// Destination for one status line per block.
///
/// A sink owns its cursor semantics: each `render` call replaces whatever
/// the previous call displayed.
pub trait RenderSink {
    fn render(&mut self, line: &RenderLine) -> io::Result<()>;

    /// Called once when the stream ends.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn render(&mut self, line: &RenderLine) -> io::Result<()> {
        (**self).render(line)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

/// Terminal color and attribute for a semantic style.
pub fn terminal_style(style: Style) -> (Option<Color>, Option<Attribute>) {
    match style {
        Style::Level(ColorTag::Intense) => (Some(Color::Red), Some(Attribute::Bold)),
        Style::Level(ColorTag::Strong) => (Some(Color::Yellow), None),
        Style::Level(ColorTag::Mild) => (Some(Color::Green), None),
        Style::Level(ColorTag::Faint) => (Some(Color::White), Some(Attribute::Dim)),
        Style::Peak => (Some(Color::Cyan), None),
        Style::Rms => (Some(Color::Magenta), None),
        Style::Warning => (Some(Color::Red), Some(Attribute::Bold)),
        Style::Title => (Some(Color::Blue), None),
        Style::Plain => (None, None),
    }
}

/// Queue `text` in `style`, restoring default styling afterwards.
///
/// With `styled == false` only the text is written.
pub(crate) fn queue_styled<W: Write>(
    out: &mut W,
    text: &str,
    style: Style,
    styled: bool,
) -> io::Result<()> {
    if !styled {
        return queue!(out, Print(text));
    }
    let (color, attribute) = terminal_style(style);
    if let Some(attribute) = attribute {
        queue!(out, SetAttribute(attribute))?;
    }
    if let Some(color) = color {
        queue!(out, SetForegroundColor(color))?;
    }
    queue!(out, Print(text))?;
    if color.is_some() || attribute.is_some() {
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TerminalSink
// ---------------------------------------------------------------------------

/// Status-line renderer for standard output.
///
/// Styled: every line starts with a carriage return, clears whatever is
/// left of the previous (possibly longer) line, and is flushed immediately.
/// Plain: every line is the bare text followed by `\n`, for pipes and files.
pub struct TerminalSink<W: Write> {
    out: W,
    styled: bool,
    lines: u64,
}

impl<W: Write> TerminalSink<W> {
    /// Styled, in-place renderer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            styled: true,
            lines: 0,
        }
    }

    /// Unstyled renderer writing one line per block.
    pub fn plain(out: W) -> Self {
        Self {
            out,
            styled: false,
            lines: 0,
        }
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    /// Lines rendered so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalSink<io::Stdout> {
    /// Standard output, styled only when it is a terminal.
    pub fn stdout(styled: bool) -> Self {
        if styled {
            Self::new(io::stdout())
        } else {
            Self::plain(io::stdout())
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, line: &RenderLine) -> io::Result<()> {
        if self.styled {
            queue!(self.out, Print('\r'))?;
        }
        for segment in line.segments() {
            queue_styled(&mut self.out, &segment.text, segment.style, self.styled)?;
        }
        if self.styled {
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
        } else {
            queue!(self.out, Print('\n'))?;
        }
        self.out.flush()?;
        self.lines += 1;
        Ok(())
    }

    /// Move off the status line so later output starts on a fresh line.
    fn finish(&mut self) -> io::Result<()> {
        if self.styled && self.lines > 0 {
            queue!(self.out, Print('\n'))?;
        }
        self.out.flush()
    }
}

// ---------------------------------------------------------------------------
// LogSink
// ---------------------------------------------------------------------------

/// Emits each line's plain text through `log::info!`.
#[derive(Debug, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn render(&mut self, line: &RenderLine) -> io::Result<()> {
        log::info!(target: "mic_visualizer::levels", "{}", line.plain_text());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> RenderLine {
        let mut line = RenderLine::default();
        line.push("+0.700", Style::Level(ColorTag::Intense));
        line.push(" ", Style::Plain);
        line.push("| ", Style::Plain);
        line.push("Peak:0.700 ", Style::Peak);
        line.push("RMS:0.431", Style::Rms);
        line
    }

    fn rendered(sink: &TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.get_ref().clone()).expect("utf-8 output")
    }

    #[test]
    fn line_starts_with_carriage_return() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.render(&sample_line()).unwrap();
        let out = rendered(&sink);
        assert!(out.starts_with('\r'), "{out:?}");
        assert!(!out.contains('\n'), "{out:?}");
    }

    #[test]
    fn text_survives_styling() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.render(&sample_line()).unwrap();
        let out = rendered(&sink);
        for piece in ["+0.700", "Peak:0.700 ", "RMS:0.431"] {
            assert!(out.contains(piece), "missing {piece:?} in {out:?}");
        }
        assert!(out.contains('\u{1b}'), "expected escape codes in {out:?}");
    }

    #[test]
    fn consecutive_lines_overwrite() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.render(&sample_line()).unwrap();
        sink.render(&sample_line()).unwrap();
        let out = rendered(&sink);
        assert_eq!(out.matches('\r').count(), 2);
        assert_eq!(sink.lines(), 2);
    }

    #[test]
    fn finish_ends_line_once_rendered() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.finish().unwrap();
        assert!(sink.get_ref().is_empty());

        sink.render(&sample_line()).unwrap();
        sink.finish().unwrap();
        assert!(rendered(&sink).ends_with('\n'));
    }

    #[test]
    fn plain_mode_writes_one_bare_line_per_block() {
        let mut sink = TerminalSink::plain(Vec::new());
        assert!(!sink.is_styled());
        sink.render(&sample_line()).unwrap();
        sink.render(&sample_line()).unwrap();
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let expected = "+0.700 | Peak:0.700 RMS:0.431\n";
        assert_eq!(out, expected.repeat(2));
    }

    #[test]
    fn plain_segments_are_unstyled() {
        assert_eq!(terminal_style(Style::Plain), (None, None));
        assert_eq!(
            terminal_style(Style::Level(ColorTag::Faint)),
            (Some(Color::White), Some(Attribute::Dim))
        );
    }

    #[test]
    fn boxed_sinks_delegate() {
        let mut sink: Box<dyn RenderSink> = Box::new(LogSink);
        sink.render(&sample_line()).unwrap();
        sink.finish().unwrap();
    }
}
