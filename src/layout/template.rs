//! Label template: where each field of a [`LabelData`] goes on the page.

use super::metrics::{FontSet, GlyphMetrics};
use super::text::{DrawOp, LabelCanvas};
use crate::error::Result;
use crate::label::{EyeRx, LabelData};

/// Geometry and type sizes of a prescription label, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTemplate {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Left and right margin
    pub margin: f32,
    /// Body text size
    pub body_size: f32,
    /// Smallest size shrink-to-fit may reach
    pub min_size: f32,
    /// Header text size
    pub header_size: f32,
    /// Prescription grid text size
    pub grid_size: f32,
    /// Separator stroke width
    pub rule_width: f32,
    /// Lines available for notes
    pub notes_lines: usize,
}

impl Default for LabelTemplate {
    fn default() -> Self {
        // 2.25in x 1.25in thermal label
        Self {
            width: 162.0,
            height: 90.0,
            margin: 5.0,
            body_size: 5.5,
            min_size: 3.5,
            header_size: 7.0,
            grid_size: 5.5,
            rule_width: 0.5,
            notes_lines: 2,
        }
    }
}

const GRID_HEADINGS: [&str; 5] = ["SPH", "CYL", "AXIS", "ADD", "PD"];

impl LabelTemplate {
    /// Create the default template.
    pub fn new() -> Self {
        Self::default()
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Column left edges of the OD/OS grid: eye label, then 5 values.
    fn grid_columns(&self) -> [f32; 6] {
        let label_width = 14.0;
        let cell = (self.content_width() - label_width) / 5.0;
        let mut cols = [self.margin; 6];
        for (i, col) in cols.iter_mut().enumerate().skip(1) {
            *col = self.margin + label_width + cell * (i - 1) as f32;
        }
        cols
    }

    fn grid_cell_width(&self) -> f32 {
        (self.content_width() - 14.0) / 5.0 - 1.0
    }

    /// Lay out one label.
    pub fn layout<F: GlyphMetrics>(&self, label: &LabelData, fonts: &FontSet<F>) -> Result<Vec<DrawOp>> {
        let mut canvas = LabelCanvas::new(fonts);
        let left = self.margin;
        let right = self.width - self.margin;
        let full = self.content_width();

        // Header: order and bundle position
        let position = if label.bundle_count > 0 {
            format!("Bundle {}/{}", label.bundle_index, label.bundle_count)
        } else {
            String::new()
        };
        let position_width = canvas.measure(&position, self.body_size)?;
        canvas.draw_right(&position, right, 10.0, self.body_size)?;
        canvas.draw_fitted(
            &format!("Order {}", label.order_id),
            left,
            10.0,
            full - position_width - 3.0,
            self.header_size,
            self.min_size,
        )?;
        canvas.hline(13.0, left, right, self.rule_width);

        canvas.draw_center_fitted(
            &label.prescription_type,
            self.width / 2.0,
            20.0,
            full,
            self.header_size - 0.5,
            self.min_size,
        )?;

        // OD/OS grid
        let cols = self.grid_columns();
        let cell = self.grid_cell_width();
        for (i, heading) in GRID_HEADINGS.iter().enumerate() {
            canvas.draw_left(heading, cols[i + 1], 27.0, self.grid_size - 1.0)?;
        }
        self.grid_row(&mut canvas, "OD", &label.od, 34.0, &cols, cell)?;
        self.grid_row(&mut canvas, "OS", &label.os, 41.0, &cols, cell)?;
        canvas.hline(44.5, left, right, self.rule_width);

        // Items
        let lens_line = if label.lens.is_empty() {
            format!("Lens: {}", label.thickness)
        } else {
            format!("Lens: {} - {}", label.thickness, label.lens)
        };
        canvas.draw_fitted(&lens_line, left, 52.0, full, self.body_size, self.min_size)?;
        canvas.draw_fitted(
            &format!("Coating: {}", label.coating),
            left,
            59.0,
            full,
            self.body_size,
            self.min_size,
        )?;
        if !label.frame.is_empty() {
            canvas.draw_fitted(
                &format!("Frame: {}", label.frame),
                left,
                66.0,
                full,
                self.body_size,
                self.min_size,
            )?;
        }
        if !label.notes.is_empty() {
            canvas.draw_wrapped(
                &format!("Notes: {}", label.notes),
                left,
                72.5,
                full,
                self.body_size - 1.0,
                5.0,
                self.notes_lines,
            )?;
        }

        canvas.draw_fitted(
            &label.customer_name,
            left,
            self.height - 4.0,
            full,
            self.body_size,
            self.min_size,
        )?;

        Ok(canvas.into_ops())
    }

    fn grid_row<F: GlyphMetrics>(
        &self,
        canvas: &mut LabelCanvas<'_, F>,
        eye: &str,
        rx: &EyeRx,
        top: f32,
        cols: &[f32; 6],
        cell: f32,
    ) -> Result<()> {
        canvas.draw_left(eye, cols[0], top, self.grid_size)?;
        let values = [&rx.sph, &rx.cyl, &rx.axis, &rx.add, &rx.pd];
        for (i, value) in values.iter().enumerate() {
            canvas.draw_fitted(value, cols[i + 1], top, cell, self.grid_size, self.min_size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::FixedMetrics;
    use crate::layout::script::FontSlot;

    fn fonts() -> FontSet<FixedMetrics> {
        FontSet::new().with(FontSlot::Latin, FixedMetrics { advance: 500.0 })
    }

    fn sample() -> LabelData {
        LabelData {
            order_id: "1001".into(),
            bundle_id: "1".into(),
            bundle_index: 1,
            bundle_count: 2,
            customer_name: "Ada Lovelace".into(),
            prescription_type: "Single Vision".into(),
            od: EyeRx {
                sph: "-2.00".into(),
                axis: "90".into(),
                pd: "31.00".into(),
                ..Default::default()
            },
            os: EyeRx::default(),
            frame: "Round Frame".into(),
            lens: "1.67 Index Lens".into(),
            thickness: "1.67 index lens".into(),
            coating: "Blue Light Blocking".into(),
            notes: String::new(),
        }
    }

    fn drawn(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                DrawOp::Line { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_layout_places_fields() {
        let ops = LabelTemplate::default().layout(&sample(), &fonts()).unwrap();
        let texts = drawn(&ops);
        assert!(texts.contains(&"Order 1001".to_string()));
        assert!(texts.contains(&"Bundle 1/2".to_string()));
        assert!(texts.contains(&"-2.00".to_string()));
        assert!(texts.contains(&"Ada Lovelace".to_string()));
        assert_eq!(ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count(), 2);
    }

    #[test]
    fn test_layout_stays_inside_page() {
        let template = LabelTemplate::default();
        let mut label = sample();
        label.notes = "Fit with extra care; customer prefers lightweight lenses ".repeat(4);
        label.frame = "Very Long Frame Name ".repeat(8);
        let ops = template.layout(&label, &fonts()).unwrap();
        for op in &ops {
            if let DrawOp::Text { text, x, size, top, .. } = op {
                let width = text.chars().count() as f32 * size * 0.5;
                assert!(*x >= 0.0, "{} starts off page", text);
                assert!(x + width <= template.width + 0.01, "{} overflows", text);
                assert!(*top <= template.height);
            }
        }
    }
}
