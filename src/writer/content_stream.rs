//! PDF content stream builder.
//!
//! Builds page content streams from text and line operators according to
//! PDF specification ISO 32000-1:2008 Sections 8-9.

use super::object_serializer::{escape_literal, format_number};
use crate::error::Result;
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Set text matrix to a translation (Tm)
    SetTextPosition(f32, f32),
    /// Show literal text (Tj), single-byte encoded
    ShowText(Vec<u8>),
    /// Show hex-encoded glyph IDs (Tj), for Identity-H fonts
    ShowGlyphs(Vec<u16>),
    /// Set fill color gray (g)
    SetFillGray(f32),
    /// Set stroke color gray (G)
    SetStrokeGray(f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Stroke (S)
    Stroke,
}

/// Builder for one page's content stream.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    /// Operations in the stream
    operations: Vec<ContentStreamOp>,
    /// Current font resource and size
    current_font: Option<(String, f32)>,
    /// Whether we're in a text object
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object. The font must be set again inside the next one.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
            self.current_font = None;
        }
        self
    }

    /// Set font for text operations, skipping redundant changes.
    pub fn set_font(&mut self, resource: &str, size: f32) -> &mut Self {
        self.begin_text();
        let unchanged = self
            .current_font
            .as_ref()
            .is_some_and(|(name, current)| name == resource && *current == size);
        if !unchanged {
            self.op(ContentStreamOp::SetFont(resource.to_string(), size));
            self.current_font = Some((resource.to_string(), size));
        }
        self
    }

    /// Show single-byte text with its baseline origin at `(x, y)`.
    pub fn text(&mut self, text: &[u8], x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextPosition(x, y));
        self.op(ContentStreamOp::ShowText(text.to_vec()))
    }

    /// Show glyph IDs of an Identity-H font at `(x, y)`.
    pub fn glyphs(&mut self, glyphs: Vec<u16>, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextPosition(x, y));
        self.op(ContentStreamOp::ShowGlyphs(glyphs))
    }

    /// Stroke a horizontal line at height `y`.
    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, width: f32) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SetLineWidth(width))
            .op(ContentStreamOp::MoveTo(x1, y))
            .op(ContentStreamOp::LineTo(x2, y))
            .op(ContentStreamOp::Stroke)
    }

    /// Build the content stream to bytes, closing any open text object.
    pub fn build(&mut self) -> Result<Vec<u8>> {
        self.end_text();
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }
}

fn num(value: f32) -> String {
    format_number(value as f64)
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, num(*size)),
        ContentStreamOp::SetTextPosition(x, y) => write!(w, "1 0 0 1 {} {} Tm", num(*x), num(*y)),
        ContentStreamOp::ShowText(text) => {
            write!(w, "(")?;
            w.write_all(&escape_literal(text))?;
            write!(w, ") Tj")
        },
        ContentStreamOp::ShowGlyphs(glyphs) => {
            write!(w, "<")?;
            for gid in glyphs {
                write!(w, "{:04X}", gid)?;
            }
            write!(w, "> Tj")
        },
        ContentStreamOp::SetFillGray(g) => write!(w, "{} g", num(*g)),
        ContentStreamOp::SetStrokeGray(g) => write!(w, "{} G", num(*g)),
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", num(*width)),
        ContentStreamOp::MoveTo(x, y) => write!(w, "{} {} m", num(*x), num(*y)),
        ContentStreamOp::LineTo(x, y) => write!(w, "{} {} l", num(*x), num(*y)),
        ContentStreamOp::Stroke => write!(w, "S"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_font("F1", 7.0).text(b"Order (1)", 5.0, 80.0);

        let bytes = builder.build().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert_eq!(content, "BT\n/F1 7 Tf\n1 0 0 1 5 80 Tm\n(Order \\(1\\)) Tj\nET\n");
    }

    #[test]
    fn test_font_set_once_per_text_object() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .set_font("F1", 5.5)
            .text(b"a", 0.0, 0.0)
            .set_font("F1", 5.5)
            .text(b"b", 3.0, 0.0)
            .set_font("F2", 5.5)
            .glyphs(vec![0x1A2B], 6.0, 0.0);
        let ops = builder.operations();
        let fonts = ops
            .iter()
            .filter(|op| matches!(op, ContentStreamOp::SetFont(..)))
            .count();
        assert_eq!(fonts, 2);

        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert!(content.contains("<1A2B> Tj"));
    }

    #[test]
    fn test_hline_closes_text_object() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .set_font("F1", 5.0)
            .text(b"x", 0.0, 0.0)
            .hline(5.0, 157.0, 77.0, 0.5)
            .set_font("F1", 5.0);
        let content = String::from_utf8(builder.build().unwrap()).unwrap();
        assert!(content.contains("ET\n0.5 w\n5 77 m\n157 77 l\nS\nBT\n/F1 5 Tf"));
    }
}
