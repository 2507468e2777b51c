//! Tracking of glyphs drawn with an embedded font.
//!
//! Fonts are embedded whole, but the CIDFont `W` array and the ToUnicode
//! CMap only list glyphs that were actually drawn.

use crate::object::Object;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum entries per `beginbfchar` section.
const BFCHAR_CHUNK: usize = 100;

/// Characters and glyphs drawn with one font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphUsage {
    /// Used code points mapped to their glyph IDs
    used_chars: BTreeMap<u32, u16>,
    /// Used glyph IDs
    used_glyphs: BTreeSet<u16>,
}

impl GlyphUsage {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a character as drawn.
    pub fn use_char(&mut self, codepoint: u32, glyph_id: u16) {
        self.used_chars.entry(codepoint).or_insert(glyph_id);
        self.used_glyphs.insert(glyph_id);
    }

    /// Record every character of a string; unmapped characters are skipped.
    pub fn use_string(&mut self, text: &str, glyph_lookup: impl Fn(u32) -> Option<u16>) {
        for ch in text.chars() {
            let codepoint = ch as u32;
            if let Some(glyph_id) = glyph_lookup(codepoint) {
                self.use_char(codepoint, glyph_id);
            }
        }
    }

    /// Used glyph IDs, ascending.
    pub fn used_glyphs(&self) -> &BTreeSet<u16> {
        &self.used_glyphs
    }

    /// Used code point → glyph mapping.
    pub fn used_chars(&self) -> &BTreeMap<u32, u16> {
        &self.used_chars
    }

    /// Number of distinct glyphs.
    pub fn glyph_count(&self) -> usize {
        self.used_glyphs.len()
    }

    /// Whether nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.used_glyphs.is_empty()
    }

    /// CIDFont `W` array: `[start [w1 w2 ...] start2 [...] ...]` over runs of
    /// consecutive glyph IDs. With Identity-H, CID = GID.
    pub fn widths_array(&self, glyph_width: impl Fn(u16) -> u16) -> Object {
        let glyphs: Vec<u16> = self.used_glyphs.iter().copied().collect();
        let mut result = Vec::new();

        let mut i = 0;
        while i < glyphs.len() {
            let start = glyphs[i];
            let mut widths = vec![Object::Integer(glyph_width(start) as i64)];
            while i + 1 < glyphs.len() && glyphs[i + 1] == glyphs[i] + 1 {
                i += 1;
                widths.push(Object::Integer(glyph_width(glyphs[i]) as i64));
            }
            result.push(Object::Integer(start as i64));
            result.push(Object::Array(widths));
            i += 1;
        }

        Object::Array(result)
    }

    /// ToUnicode CMap mapping each used glyph back to its code point.
    pub fn tounicode_cmap(&self) -> String {
        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        // One entry per glyph; the lowest code point wins for shared glyphs
        let mut by_glyph: BTreeMap<u16, u32> = BTreeMap::new();
        for (&codepoint, &gid) in &self.used_chars {
            by_glyph.entry(gid).or_insert(codepoint);
        }
        let mappings: Vec<(u16, u32)> = by_glyph.into_iter().collect();

        for chunk in mappings.chunks(BFCHAR_CHUNK) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, codepoint) in chunk {
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16_hex(codepoint)));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\nend\n");
        cmap
    }
}

/// UTF-16BE hex of a code point, surrogate pair above the BMP.
fn utf16_hex(codepoint: u32) -> String {
    if codepoint <= 0xFFFF {
        format!("{:04X}", codepoint)
    } else {
        let offset = codepoint - 0x10000;
        let high = (offset >> 10) + 0xD800;
        let low = (offset & 0x3FF) + 0xDC00;
        format!("{:04X}{:04X}", high, low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_string() {
        let mut usage = GlyphUsage::new();
        usage.use_string("ABA", |cp| Some(cp as u16));
        assert_eq!(usage.glyph_count(), 2);
        assert!(usage.used_chars().contains_key(&0x41));

        let mut usage = GlyphUsage::new();
        usage.use_string("x", |_| None);
        assert!(usage.is_empty());
    }

    #[test]
    fn test_widths_array_groups_consecutive() {
        let mut usage = GlyphUsage::new();
        for (cp, gid) in [(0x4E2D, 5), (0x6587, 6), (0x5B57, 9)] {
            usage.use_char(cp, gid);
        }
        let w = usage.widths_array(|gid| if gid == 9 { 500 } else { 1000 });
        assert_eq!(
            w,
            Object::Array(vec![
                Object::Integer(5),
                Object::Array(vec![Object::Integer(1000), Object::Integer(1000)]),
                Object::Integer(9),
                Object::Array(vec![Object::Integer(500)]),
            ])
        );
    }

    #[test]
    fn test_tounicode_cmap_entries() {
        let mut usage = GlyphUsage::new();
        usage.use_char(0x4E2D, 12);
        usage.use_char(0x20BB7, 13);
        let cmap = usage.tounicode_cmap();
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<000C> <4E2D>"));
        assert!(cmap.contains("<000D> <D842DFB7>"));
        assert!(cmap.ends_with("end\nend\n"));
    }
}
