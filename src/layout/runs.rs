//! Text runs: maximal stretches of characters drawn with one font.

use super::metrics::{FontSet, GlyphMetrics};
use super::script::FontSlot;
use crate::error::Result;

/// A contiguous piece of text sharing one font slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Font slot
    pub slot: FontSlot,
    /// Characters of the run
    pub text: String,
}

/// Split text into font runs.
pub fn segment<F: GlyphMetrics>(text: &str, fonts: &FontSet<F>) -> Result<Vec<TextRun>> {
    let mut runs: Vec<TextRun> = Vec::new();
    for ch in text.chars() {
        let slot = fonts.slot_for(ch)?;
        match runs.last_mut() {
            Some(run) if run.slot == slot => run.text.push(ch),
            _ => runs.push(TextRun {
                slot,
                text: ch.to_string(),
            }),
        }
    }
    Ok(runs)
}

/// Width of one run.
pub fn run_width<F: GlyphMetrics>(run: &TextRun, size: f32, fonts: &FontSet<F>) -> f32 {
    fonts
        .get(run.slot)
        .map(|font| font.run_width(&run.text, size))
        .unwrap_or(0.0)
}

/// Total width of text: the sum of its run widths.
pub fn measure<F: GlyphMetrics>(text: &str, size: f32, fonts: &FontSet<F>) -> Result<f32> {
    Ok(segment(text, fonts)?
        .iter()
        .map(|run| run_width(run, size, fonts))
        .sum())
}
