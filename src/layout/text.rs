//! Positioned text drawing on a fixed-size label.
//!
//! Coordinates are in points with `top` measured downward from the top edge
//! of the label to the text baseline. Every draw normalizes whitespace first
//! and emits one [`DrawOp::Text`] per font run, advancing a cursor by each
//! run's measured width.

use super::metrics::{FontSet, GlyphMetrics};
use super::runs::{run_width, segment};
use super::script::FontSlot;
use crate::error::Result;
use crate::label::normalize::normalize_text;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A single-font run of text
    Text {
        /// Characters to draw
        text: String,
        /// Font slot
        slot: FontSlot,
        /// Font size in points
        size: f32,
        /// Left edge of the run
        x: f32,
        /// Baseline distance from the top edge
        top: f32,
    },
    /// Horizontal rule
    Line {
        /// Distance from the top edge
        top: f32,
        /// Start x
        x1: f32,
        /// End x
        x2: f32,
        /// Stroke width
        width: f32,
    },
}

/// Collects draw operations for one label.
#[derive(Debug)]
pub struct LabelCanvas<'a, F> {
    fonts: &'a FontSet<F>,
    ops: Vec<DrawOp>,
}

impl<'a, F: GlyphMetrics> LabelCanvas<'a, F> {
    /// Start an empty canvas.
    pub fn new(fonts: &'a FontSet<F>) -> Self {
        Self {
            fonts,
            ops: Vec::new(),
        }
    }

    /// Fonts used for measurement.
    pub fn fonts(&self) -> &'a FontSet<F> {
        self.fonts
    }

    /// Operations so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the finished operations.
    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Measure already-normalized text.
    pub fn measure(&self, text: &str, size: f32) -> Result<f32> {
        super::runs::measure(text, size, self.fonts)
    }

    /// Draw text with its left edge at `x`. Returns the drawn width.
    pub fn draw_left(&mut self, text: &str, x: f32, top: f32, size: f32) -> Result<f32> {
        let text = normalize_text(text);
        self.emit_runs(&text, x, top, size)
    }

    /// Draw text centered on `center_x`. Returns the drawn width.
    pub fn draw_center(&mut self, text: &str, center_x: f32, top: f32, size: f32) -> Result<f32> {
        let text = normalize_text(text);
        let width = self.measure(&text, size)?;
        self.emit_runs(&text, center_x - width / 2.0, top, size)
    }

    /// Draw text with its right edge at `right_x`. Returns the drawn width.
    pub fn draw_right(&mut self, text: &str, right_x: f32, top: f32, size: f32) -> Result<f32> {
        let text = normalize_text(text);
        let width = self.measure(&text, size)?;
        self.emit_runs(&text, right_x - width, top, size)
    }

    /// Horizontal separator.
    pub fn hline(&mut self, top: f32, x1: f32, x2: f32, width: f32) {
        self.ops.push(DrawOp::Line { top, x1, x2, width });
    }

    fn emit_runs(&mut self, text: &str, x: f32, top: f32, size: f32) -> Result<f32> {
        let runs = segment(text, self.fonts)?;
        let mut cursor = x;
        for run in runs {
            let advance = run_width(&run, size, self.fonts);
            self.ops.push(DrawOp::Text {
                text: run.text,
                slot: run.slot,
                size,
                x: cursor,
                top,
            });
            cursor += advance;
        }
        Ok(cursor - x)
    }

    /// Greedy word wrap into at most `max_lines` lines of `width`.
    ///
    /// Words wider than a line are broken between characters. When content
    /// remains after the last line, that line is shortened until it fits
    /// with [`ELLIPSIS`] appended.
    pub fn wrap_lines(
        &self,
        text: &str,
        width: f32,
        size: f32,
        max_lines: usize,
    ) -> Result<Vec<String>> {
        let text = normalize_text(text);
        if text.is_empty() || max_lines == 0 {
            return Ok(Vec::new());
        }

        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut overflow = false;

        for word in text.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if self.measure(&candidate, size)? <= width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if self.measure(word, size)? <= width {
                current = word.to_string();
            } else {
                let mut pieces = self.break_word(word, width, size)?;
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }

            if lines.len() >= max_lines {
                overflow = lines.len() > max_lines || !current.is_empty();
                break;
            }
        }

        if !overflow && !current.is_empty() {
            lines.push(current);
        }
        if lines.len() > max_lines {
            lines.truncate(max_lines);
            overflow = true;
        }
        if overflow {
            if let Some(last) = lines.last_mut() {
                *last = self.with_ellipsis(last, width, size)?;
            }
        }
        Ok(lines)
    }

    /// Break a word into pieces that each fit `width`. Every piece holds at
    /// least one character.
    fn break_word(&self, word: &str, width: f32, size: f32) -> Result<Vec<String>> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        for ch in word.chars() {
            piece.push(ch);
            if piece.chars().count() > 1 && self.measure(&piece, size)? > width {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(ch);
            }
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        Ok(pieces)
    }

    /// Shorten `line` until it fits with the ellipsis appended.
    fn with_ellipsis(&self, line: &str, width: f32, size: f32) -> Result<String> {
        let mut chars: Vec<char> = line.chars().collect();
        loop {
            let head: String = chars.iter().collect();
            let candidate = format!("{}{}", head.trim_end(), ELLIPSIS);
            if chars.is_empty() || self.measure(&candidate, size)? <= width {
                return Ok(candidate);
            }
            chars.pop();
        }
    }

    /// Fit one line into `width`.
    ///
    /// The size steps down by one point per try, never below `min_size`. If
    /// the text still overflows at `min_size`, it is cut to the longest
    /// character prefix that fits with [`ELLIPSIS`] appended. Returns the
    /// text and size to draw.
    pub fn fit_line(
        &self,
        text: &str,
        width: f32,
        size: f32,
        min_size: f32,
    ) -> Result<(String, f32)> {
        let text = normalize_text(text);
        let floor = min_size.min(size);
        let mut current = size;
        loop {
            if self.measure(&text, current)? <= width {
                return Ok((text, current));
            }
            if current <= floor {
                break;
            }
            current = (current - 1.0).max(floor);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut lo = 0usize;
        let mut hi = chars.len();
        let mut best: Option<String> = None;
        while lo <= hi {
            let mid = (lo + hi) / 2;
            let head: String = chars[..mid].iter().collect();
            let candidate = format!("{}{}", head.trim_end(), ELLIPSIS);
            if self.measure(&candidate, floor)? <= width {
                best = Some(candidate);
                lo = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                hi = mid - 1;
            }
        }
        Ok((best.unwrap_or_default(), floor))
    }

    /// Wrap and draw text, one line every `leading` points. Returns the
    /// number of lines drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_wrapped(
        &mut self,
        text: &str,
        x: f32,
        top: f32,
        width: f32,
        size: f32,
        leading: f32,
        max_lines: usize,
    ) -> Result<usize> {
        let lines = self.wrap_lines(text, width, size, max_lines)?;
        for (i, line) in lines.iter().enumerate() {
            self.emit_runs(line, x, top + i as f32 * leading, size)?;
        }
        Ok(lines.len())
    }

    /// Fit and draw one line starting at `x`. Returns the size used.
    pub fn draw_fitted(
        &mut self,
        text: &str,
        x: f32,
        top: f32,
        width: f32,
        size: f32,
        min_size: f32,
    ) -> Result<f32> {
        let (line, used) = self.fit_line(text, width, size, min_size)?;
        self.emit_runs(&line, x, top, used)?;
        Ok(used)
    }

    /// Fit and draw one line centered on `center_x`. Returns the size used.
    pub fn draw_center_fitted(
        &mut self,
        text: &str,
        center_x: f32,
        top: f32,
        width: f32,
        size: f32,
        min_size: f32,
    ) -> Result<f32> {
        let (line, used) = self.fit_line(text, width, size, min_size)?;
        let drawn = self.measure(&line, used)?;
        self.emit_runs(&line, center_x - drawn / 2.0, top, used)?;
        Ok(used)
    }
}
