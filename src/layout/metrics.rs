//! Glyph metrics and the slot → font table.

use super::script::{classify, FontSlot, UNCLASSIFIED_SCRIPT};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Metrics a font must provide for layout.
pub trait GlyphMetrics {
    /// Whether the font maps `ch` to a real glyph.
    fn has_glyph(&self, ch: char) -> bool;

    /// Advance width of `text` at `size`, in points.
    fn run_width(&self, text: &str, size: f32) -> f32;
}

impl<T: GlyphMetrics + ?Sized> GlyphMetrics for &T {
    fn has_glyph(&self, ch: char) -> bool {
        (**self).has_glyph(ch)
    }

    fn run_width(&self, text: &str, size: f32) -> f32 {
        (**self).run_width(text, size)
    }
}

/// Fonts available to a render, one per slot.
#[derive(Debug, Clone)]
pub struct FontSet<F> {
    fonts: BTreeMap<FontSlot, F>,
}

impl<F> Default for FontSet<F> {
    fn default() -> Self {
        Self {
            fonts: BTreeMap::new(),
        }
    }
}

impl<F: GlyphMetrics> FontSet<F> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a font to a slot.
    pub fn insert(&mut self, slot: FontSlot, font: F) -> &mut Self {
        self.fonts.insert(slot, font);
        self
    }

    /// Assign a font to a slot, builder style.
    pub fn with(mut self, slot: FontSlot, font: F) -> Self {
        self.insert(slot, font);
        self
    }

    /// Font of a slot.
    pub fn get(&self, slot: FontSlot) -> Option<&F> {
        self.fonts.get(&slot)
    }

    /// Whether a slot has a font.
    pub fn contains(&self, slot: FontSlot) -> bool {
        self.fonts.contains_key(&slot)
    }

    /// Loaded slots and their fonts, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FontSlot, &F)> {
        self.fonts.iter().map(|(slot, font)| (*slot, font))
    }

    /// Slot that draws `ch`.
    ///
    /// Unclassified characters go to the first loaded CJK font in
    /// [`FontSlot::FALLBACK`] order, whether or not it has the glyph.
    pub fn slot_for(&self, ch: char) -> Result<FontSlot> {
        match classify(ch) {
            Some(slot) if self.contains(slot) => Ok(slot),
            Some(slot) => Err(Error::FontUnavailable {
                code: ch as u32,
                script: slot.script_name(),
            }),
            None => FontSlot::FALLBACK
                .iter()
                .copied()
                .find(|slot| self.contains(*slot))
                .ok_or(Error::FontUnavailable {
                    code: ch as u32,
                    script: UNCLASSIFIED_SCRIPT,
                }),
        }
    }
}

/// Monospace metrics for tests: every glyph is `advance / 1000` em wide.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedMetrics {
    pub advance: f32,
}

#[cfg(test)]
impl GlyphMetrics for FixedMetrics {
    fn has_glyph(&self, _ch: char) -> bool {
        true
    }

    fn run_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * self.advance * size / 1000.0
    }
}
