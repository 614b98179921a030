//! Styled status line handed to a [`RenderSink`](crate::render::RenderSink).
//!
//! A [`RenderLine`] is sink-agnostic: it carries text plus a semantic
//! [`Style`] per segment, and each sink decides how a style looks.

use super::ColorTag;

/// Semantic style of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// A sample value colored by its amplitude class.
    Level(ColorTag),
    /// Averaged peak statistic.
    Peak,
    /// Averaged RMS statistic.
    Rms,
    /// Transient stream condition marker.
    Warning,
    /// Banner heading.
    Title,
    /// Separators and spacing.
    Plain,
}

/// One run of identically styled text.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

/// An ordered sequence of styled segments forming one status line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderLine {
    segments: Vec<Segment>,
}

impl RenderLine {
    pub fn with_capacity(segments: usize) -> Self {
        Self {
            segments: Vec::with_capacity(segments),
        }
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        self.segments.push(Segment {
            text: text.into(),
            style,
        });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments carrying a sample level, in order.
    pub fn levels(&self) -> impl Iterator<Item = ColorTag> + '_ {
        self.segments.iter().filter_map(|s| match s.style {
            Style::Level(tag) => Some(tag),
            _ => None,
        })
    }

    /// The line without any styling.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}
