//! Integration tests for multi-script label layout.
//!
//! A fixed-advance font stands in for real font files: Latin glyphs are
//! 0.5 em and CJK glyphs 1 em wide.

use proptest::prelude::*;
use rxlabel::layout::{measure, DrawOp, FontSet, FontSlot, GlyphMetrics, LabelCanvas, LabelTemplate, ELLIPSIS};
use rxlabel::writer::LabelFont;
use rxlabel::{Error, LabelData};

// ============================================================================
// Helper Functions
// ============================================================================

struct MonoFont {
    advance: f32,
}

impl GlyphMetrics for MonoFont {
    fn has_glyph(&self, _ch: char) -> bool {
        true
    }

    fn run_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * self.advance * size / 1000.0
    }
}

fn mono_fonts() -> FontSet<MonoFont> {
    FontSet::new()
        .with(FontSlot::Latin, MonoFont { advance: 500.0 })
        .with(FontSlot::SimplifiedChinese, MonoFont { advance: 1000.0 })
        .with(FontSlot::Japanese, MonoFont { advance: 1000.0 })
        .with(FontSlot::Korean, MonoFont { advance: 1000.0 })
}

fn text_ops(ops: &[DrawOp]) -> Vec<(String, FontSlot, f32)> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, slot, x, .. } => Some((text.clone(), *slot, *x)),
            DrawOp::Line { .. } => None,
        })
        .collect()
}

fn mixed_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['a', 'W', '1', '.', ' ', ' ', '王', 'さ', 'カ', '김', 'é']),
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

// ============================================================================
// Runs and measurement
// ============================================================================

#[test]
fn test_mixed_line_draws_one_op_per_run() {
    let fonts = mono_fonts();
    let mut canvas = LabelCanvas::new(&fonts);
    let width = canvas.draw_left("Wang  王伟 / さくら", 10.0, 20.0, 10.0).unwrap();

    let ops = text_ops(canvas.ops());
    let runs: Vec<(&str, FontSlot)> = ops.iter().map(|(t, s, _)| (t.as_str(), *s)).collect();
    assert_eq!(
        runs,
        vec![
            ("Wang ", FontSlot::Latin),
            ("王伟", FontSlot::SimplifiedChinese),
            (" / ", FontSlot::Latin),
            ("さくら", FontSlot::Japanese),
        ]
    );
    // 5 + 2 + 3 + 3 glyphs at 5 / 10 / 5 / 10 pt
    assert_eq!(ops[1].2, 35.0);
    assert_eq!(ops[2].2, 55.0);
    assert_eq!(ops[3].2, 70.0);
    assert_eq!(width, 90.0);
}

#[test]
fn test_unclassified_characters_use_cjk_font() {
    let fonts = mono_fonts();
    let mut canvas = LabelCanvas::new(&fonts);
    canvas.draw_left("Zoë", 0.0, 10.0, 10.0).unwrap();
    let slots: Vec<FontSlot> = text_ops(canvas.ops()).into_iter().map(|(_, s, _)| s).collect();
    assert_eq!(slots, vec![FontSlot::Latin, FontSlot::SimplifiedChinese]);
}

#[test]
fn test_helvetica_only_rejects_cjk() {
    let fonts = FontSet::new().with(FontSlot::Latin, LabelFont::helvetica());
    let mut canvas = LabelCanvas::new(&fonts);
    assert!(canvas.draw_left("Ann Lee", 0.0, 10.0, 7.0).is_ok());
    match canvas.draw_left("김", 0.0, 10.0, 7.0) {
        Err(Error::FontUnavailable { code, script }) => {
            assert_eq!(code, 0xAE40);
            assert_eq!(script, "Korean");
        },
        other => panic!("expected unavailable font, got {:?}", other),
    }
}

#[test]
fn test_center_draw_is_symmetric() {
    let fonts = mono_fonts();
    let mut canvas = LabelCanvas::new(&fonts);
    canvas.draw_center("Progressive", 81.0, 20.0, 10.0).unwrap();
    let ops = text_ops(canvas.ops());
    // 11 glyphs x 5pt
    assert_eq!(ops[0].2, 81.0 - 27.5);
}

// ============================================================================
// Wrapping and fitting
// ============================================================================

#[test]
fn test_wrap_overflow_ends_with_ellipsis() {
    let fonts = mono_fonts();
    let canvas = LabelCanvas::new(&fonts);
    let lines = canvas
        .wrap_lines("alpha beta gamma delta epsilon", 50.0, 10.0, 2)
        .unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "alpha beta");
    assert!(lines[1].ends_with(ELLIPSIS));
    assert!(canvas.measure(&lines[1], 10.0).unwrap() <= 50.0);
}

#[test]
fn test_fit_shrinks_then_truncates() {
    let fonts = mono_fonts();
    let canvas = LabelCanvas::new(&fonts);

    // 10 glyphs: 50pt at 10, 40pt at 8
    let (text, size) = canvas.fit_line("Anti-Glare", 40.0, 10.0, 6.0).unwrap();
    assert_eq!(text, "Anti-Glare");
    assert_eq!(size, 8.0);

    let (text, size) = canvas.fit_line("Anti-Glare Coating", 40.0, 10.0, 8.0).unwrap();
    assert_eq!(size, 8.0);
    assert_eq!(text, "Anti-Gl...");
}

#[test]
fn test_template_with_helvetica_stays_on_label() {
    let fonts = FontSet::new().with(FontSlot::Latin, LabelFont::helvetica());
    let template = LabelTemplate::default();
    let label = LabelData {
        order_id: "100234".into(),
        bundle_id: "1".into(),
        bundle_index: 1,
        bundle_count: 1,
        customer_name: "Maximilian Alexander Featherstonehaugh-Worthington".into(),
        prescription_type: "Progressive".into(),
        lens: "1.74 High Index Lens; Transitions Lens".into(),
        thickness: "1.74 index lens".into(),
        coating: "Blue Light Blocking".into(),
        notes: "Please use the thinnest possible edge and double check the segment height".into(),
        ..Default::default()
    };
    let ops = template.layout(&label, &fonts).unwrap();
    for op in &ops {
        if let DrawOp::Text { text, size, x, top, .. } = op {
            let right = x + measure(text, *size, &fonts).unwrap();
            assert!(*x >= 0.0 && right <= template.width + 1e-3, "{:?} overflows", text);
            assert!(*top > 0.0 && *top <= template.height);
            assert!(*size >= template.min_size);
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_drawn_width_matches_measure(text in mixed_text(), size in 4.0f32..12.0) {
        let fonts = mono_fonts();
        let mut canvas = LabelCanvas::new(&fonts);
        let drawn = canvas.draw_left(&text, 3.0, 10.0, size).unwrap();

        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let measured = canvas.measure(&normalized, size).unwrap();
        prop_assert!((drawn - measured).abs() < 1e-3);

        // Each run starts where the previous one ended
        let ops = text_ops(canvas.ops());
        let mut cursor = 3.0f32;
        for (run, slot, x) in &ops {
            prop_assert!((x - cursor).abs() < 1e-3);
            let font = fonts.get(*slot).unwrap();
            cursor += font.run_width(run, size);
        }
        let joined: String = ops.iter().map(|(t, _, _)| t.as_str()).collect();
        prop_assert_eq!(joined, normalized);
    }

    #[test]
    fn prop_wrapped_lines_fit(text in mixed_text(), width in 20.0f32..120.0, max_lines in 1usize..4) {
        let fonts = mono_fonts();
        let canvas = LabelCanvas::new(&fonts);
        let lines = canvas.wrap_lines(&text, width, 10.0, max_lines).unwrap();
        prop_assert!(lines.len() <= max_lines);
        for line in &lines {
            prop_assert!(canvas.measure(line, 10.0).unwrap() <= width);
        }
    }

    #[test]
    fn prop_fitted_line_fits(text in mixed_text(), width in 5.0f32..120.0) {
        let fonts = mono_fonts();
        let canvas = LabelCanvas::new(&fonts);
        let (line, size) = canvas.fit_line(&text, width, 10.0, 4.0).unwrap();
        prop_assert!((4.0..=10.0).contains(&size));
        prop_assert!(canvas.measure(&line, size).unwrap() <= width);
    }
}
