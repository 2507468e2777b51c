//! Font handling for label output.
//!
//! This module provides TrueType parsing for the embedded CJK fonts and
//! tracking of the glyphs each font actually draws.

pub mod glyph_usage;
pub mod truetype_parser;

pub use glyph_usage::GlyphUsage;
pub use truetype_parser::{sanitize_font_name, FontMetrics, TrueTypeError, TrueTypeFont};
