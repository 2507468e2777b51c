//! TrueType/OpenType font parsing for label embedding.
//!
//! This module wraps the `ttf-parser` crate. A font is parsed once; the
//! Unicode → glyph map, advance widths and descriptor metrics are copied out
//! so the parsed face never outlives the call and the raw bytes can be
//! embedded as-is.
//!
//! # Font Embedding in PDF
//!
//! CJK label fonts are embedded as Type 0 composite fonts:
//! - FontDescriptor with metrics (ascent, descent, cap height, bbox)
//! - CIDFontType2 descendant with Identity CID → GID mapping
//! - ToUnicode CMap so drawn text stays extractable
//! - Full font program in FontFile2

use std::collections::HashMap;
use std::io;
use std::path::Path;

use ttf_parser::{Face, GlyphId};

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Failed to parse font file
    #[error("Failed to parse font file: {0}")]
    ParseError(String),

    /// Font file is empty
    #[error("Font file is empty or invalid")]
    EmptyFont,

    /// Font has no Unicode cmap subtable
    #[error("Font has no Unicode character map")]
    NoUnicodeMap,

    /// IO error while reading the font file
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<TrueTypeError> for crate::error::Error {
    fn from(err: TrueTypeError) -> Self {
        crate::error::Error::Font(err.to_string())
    }
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Parsed TrueType font, owning its data.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    /// Raw font file (embedded verbatim)
    data: Vec<u8>,
    /// Unicode code point → glyph ID
    unicode_to_glyph: HashMap<u32, u16>,
    /// Advance width per glyph ID, in 1/1000 em
    glyph_widths: Vec<u16>,
    /// Descriptor metrics
    metrics: FontMetrics,
}

impl TrueTypeFont {
    /// Parse a TrueType/OpenType font from raw bytes.
    pub fn parse(data: Vec<u8>) -> TrueTypeResult<Self> {
        if data.is_empty() {
            return Err(TrueTypeError::EmptyFont);
        }

        let face = Face::parse(&data, 0).map_err(|e| TrueTypeError::ParseError(e.to_string()))?;
        let unicode_to_glyph = unicode_map(&face);
        if unicode_to_glyph.is_empty() {
            return Err(TrueTypeError::NoUnicodeMap);
        }
        let glyph_widths = width_table(&face);
        let metrics = FontMetrics::from_face(&face);
        drop(face);

        log::debug!(
            "Parsed font {}: {} glyphs, {} mapped code points",
            metrics.name,
            glyph_widths.len(),
            unicode_to_glyph.len()
        );

        Ok(Self {
            data,
            unicode_to_glyph,
            glyph_widths,
            metrics,
        })
    }

    /// Read and parse a font file.
    pub fn from_file(path: impl AsRef<Path>) -> TrueTypeResult<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::parse(data)
    }

    /// Descriptor metrics.
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// PostScript name (or family name when absent).
    pub fn name(&self) -> &str {
        &self.metrics.name
    }

    /// Glyph ID for a code point.
    pub fn glyph_id(&self, codepoint: u32) -> Option<u16> {
        self.unicode_to_glyph.get(&codepoint).copied()
    }

    /// Glyph width in 1/1000 em units.
    pub fn glyph_width(&self, glyph_id: u16) -> u16 {
        self.glyph_widths
            .get(glyph_id as usize)
            .copied()
            .unwrap_or(1000)
    }

    /// Width of a character in 1/1000 em; unmapped characters use `.notdef`.
    pub fn char_width(&self, codepoint: u32) -> u16 {
        self.glyph_width(self.glyph_id(codepoint).unwrap_or(0))
    }

    /// Raw font data for embedding.
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }
}

/// Collect code points from every Unicode cmap subtable; the first mapping
/// seen for a code point wins.
fn unicode_map(face: &Face<'_>) -> HashMap<u32, u16> {
    let mut map = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };
    for subtable in cmap.subtables {
        if !subtable.is_unicode() {
            continue;
        }
        subtable.codepoints(|codepoint| {
            if let Some(GlyphId(gid)) = subtable.glyph_index(codepoint) {
                if gid != 0 {
                    map.entry(codepoint).or_insert(gid);
                }
            }
        });
    }
    map
}

fn width_table(face: &Face<'_>) -> Vec<u16> {
    let units_per_em = face.units_per_em().max(1) as u32;
    (0..face.number_of_glyphs())
        .map(|gid| {
            let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0) as u32;
            (advance * 1000 / units_per_em) as u16
        })
        .collect()
}

fn name_entry(face: &Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id)
        .find_map(|name| name.to_string())
}

/// Font metrics for the PDF FontDescriptor, already in 1/1000 em.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// PostScript name
    pub name: String,
    /// Family name
    pub family: String,
    /// Ascender (positive)
    pub ascender: i32,
    /// Descender (negative)
    pub descender: i32,
    /// Cap height
    pub cap_height: i32,
    /// Bounding box (llx, lly, urx, ury)
    pub bbox: (i32, i32, i32, i32),
    /// Stem V (vertical stem width)
    pub stem_v: i32,
    /// Font flags
    pub flags: u32,
}

impl FontMetrics {
    fn from_face(face: &Face<'_>) -> Self {
        let upem = face.units_per_em().max(1) as i32;
        let scale = |v: i16| v as i32 * 1000 / upem;
        let bbox = face.global_bounding_box();
        let family = name_entry(face, ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| "Unknown".to_string());
        let name = name_entry(face, ttf_parser::name_id::POST_SCRIPT_NAME)
            .unwrap_or_else(|| family.clone());

        // Bit 6 nonsymbolic, bit 1 fixed pitch
        let mut flags = 1u32 << 5;
        if face.is_monospaced() {
            flags |= 1;
        }

        Self {
            name: sanitize_font_name(&name),
            family,
            ascender: scale(face.ascender()),
            descender: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender())),
            bbox: (
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ),
            // TrueType has no StemV; estimate from weight
            stem_v: if face.is_bold() { 140 } else { 80 },
            flags,
        }
    }
}

/// Strip characters that are not allowed in a PDF BaseFont name.
pub fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_on_empty_data() {
        let result = TrueTypeFont::parse(Vec::new());
        assert!(matches!(result, Err(TrueTypeError::EmptyFont)));
    }

    #[test]
    fn test_error_on_invalid_data() {
        let result = TrueTypeFont::parse(b"not a font file".to_vec());
        assert!(matches!(result, Err(TrueTypeError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TrueTypeFont::from_file("/nonexistent/font.ttf");
        assert!(matches!(result, Err(TrueTypeError::IoError(_))));
    }

    #[test]
    fn test_sanitize_font_name() {
        assert_eq!(sanitize_font_name("Noto Sans CJK SC"), "NotoSansCJKSC");
        assert_eq!(sanitize_font_name("A(b)/c"), "Abc");
        assert_eq!(sanitize_font_name("  "), "EmbeddedFont");
    }

    #[test]
    fn test_font_error_converts_to_resource_error() {
        let err: crate::error::Error = TrueTypeError::EmptyFont.into();
        assert!(!err.is_validation());
    }
}
