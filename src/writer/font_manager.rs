//! Fonts available to the label writer.
//!
//! Latin text uses the Base-14 Helvetica font with its standard metrics and
//! WinAnsi encoding; nothing is embedded for it. Each CJK slot uses a
//! TrueType font loaded from disk and embedded whole.

use crate::error::{Error, Result};
use crate::fonts::TrueTypeFont;
use crate::layout::{FontSet, FontSlot, GlyphMetrics, ScriptUsage};
use crate::layout::script::UNCLASSIFIED_SCRIPT;
use std::path::{Path, PathBuf};

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em (Adobe AFM).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// A Base-14 font drawn without embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardFont {
    /// PostScript name
    pub name: &'static str,
}

impl StandardFont {
    /// Helvetica.
    pub fn helvetica() -> Self {
        Self { name: "Helvetica" }
    }

    /// Width of a character in 1/1000 em; 0 outside printable ASCII.
    pub fn char_width(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            HELVETICA_WIDTHS[(cp - 0x20) as usize]
        } else {
            0
        }
    }
}

impl GlyphMetrics for StandardFont {
    fn has_glyph(&self, ch: char) -> bool {
        (0x20..=0x7E).contains(&(ch as u32))
    }

    fn run_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// A TrueType font embedded as a Type 0 / CIDFontType2 font.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    font: TrueTypeFont,
}

impl EmbeddedFont {
    /// Create an embedded font from raw TTF/OTF data.
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            font: TrueTypeFont::parse(data)?,
        })
    }

    /// Load an embedded font from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading font {}", path.display());
        let font = TrueTypeFont::from_file(path)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))?;
        Ok(Self { font })
    }

    /// Parsed font.
    pub fn font(&self) -> &TrueTypeFont {
        &self.font
    }

    /// BaseFont name.
    pub fn name(&self) -> &str {
        self.font.name()
    }

    /// Glyph IDs for text under Identity-H; unmapped characters draw `.notdef`.
    pub fn glyph_ids(&self, text: &str) -> Vec<u16> {
        text.chars()
            .map(|ch| self.font.glyph_id(ch as u32).unwrap_or(0))
            .collect()
    }
}

impl GlyphMetrics for EmbeddedFont {
    fn has_glyph(&self, ch: char) -> bool {
        self.font.glyph_id(ch as u32).is_some()
    }

    fn run_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.font.char_width(c as u32) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Any font a label slot can hold.
#[derive(Debug, Clone)]
pub enum LabelFont {
    /// Base-14, not embedded
    Standard(StandardFont),
    /// Embedded TrueType
    Embedded(Box<EmbeddedFont>),
}

impl LabelFont {
    /// Built-in Helvetica.
    pub fn helvetica() -> Self {
        LabelFont::Standard(StandardFont::helvetica())
    }
}

impl GlyphMetrics for LabelFont {
    fn has_glyph(&self, ch: char) -> bool {
        match self {
            LabelFont::Standard(font) => font.has_glyph(ch),
            LabelFont::Embedded(font) => font.has_glyph(ch),
        }
    }

    fn run_width(&self, text: &str, size: f32) -> f32 {
        match self {
            LabelFont::Standard(font) => font.run_width(text, size),
            LabelFont::Embedded(font) => font.run_width(text, size),
        }
    }
}

/// Font files configured for the CJK slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSources {
    /// Simplified Chinese font file
    pub simplified_chinese: Option<PathBuf>,
    /// Japanese font file
    pub japanese: Option<PathBuf>,
    /// Korean font file
    pub korean: Option<PathBuf>,
}

impl FontSources {
    /// No CJK fonts configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the file for a slot. The Latin slot is built in and ignores
    /// this.
    pub fn with_font(mut self, slot: FontSlot, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match slot {
            FontSlot::Latin => {
                log::warn!("Latin text always uses Helvetica; ignoring font file");
            },
            FontSlot::SimplifiedChinese => self.simplified_chinese = path,
            FontSlot::Japanese => self.japanese = path,
            FontSlot::Korean => self.korean = path,
        }
        self
    }

    /// Configured file of a slot.
    pub fn path(&self, slot: FontSlot) -> Option<&Path> {
        match slot {
            FontSlot::Latin => None,
            FontSlot::SimplifiedChinese => self.simplified_chinese.as_deref(),
            FontSlot::Japanese => self.japanese.as_deref(),
            FontSlot::Korean => self.korean.as_deref(),
        }
    }

    /// Decide which CJK slots to load for `usage`, without reading any file.
    ///
    /// A slot is loaded when the text uses its script. Characters no script
    /// claims need one CJK font: a slot already being loaded covers them,
    /// otherwise the first configured of Simplified Chinese, Japanese, Korean.
    pub fn plan(&self, usage: &ScriptUsage) -> Result<Vec<FontSlot>> {
        let mut slots = Vec::new();
        for slot in FontSlot::FALLBACK {
            if let Some(ch) = usage.first_char(slot) {
                if self.path(slot).is_none() {
                    return Err(Error::FontUnavailable {
                        code: ch as u32,
                        script: slot.script_name(),
                    });
                }
                slots.push(slot);
            }
        }

        if let Some(ch) = usage.fallback_char() {
            if slots.is_empty() {
                let slot = FontSlot::FALLBACK
                    .into_iter()
                    .find(|s| self.path(*s).is_some())
                    .ok_or(Error::FontUnavailable {
                        code: ch as u32,
                        script: UNCLASSIFIED_SCRIPT,
                    })?;
                slots.push(slot);
            }
        }
        Ok(slots)
    }

    /// Load Helvetica plus exactly the CJK fonts `usage` needs.
    pub fn load_required(&self, usage: &ScriptUsage) -> Result<FontSet<LabelFont>> {
        let plan = self.plan(usage)?;
        let mut fonts = FontSet::new();
        fonts.insert(FontSlot::Latin, LabelFont::helvetica());
        for slot in plan {
            if let Some(path) = self.path(slot) {
                let font = EmbeddedFont::from_file(path)?;
                fonts.insert(slot, LabelFont::Embedded(Box::new(font)));
            }
        }
        Ok(fonts)
    }
}
