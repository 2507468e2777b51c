//! Integration tests for label PDF output.

use rxlabel::layout::{FontSlot, LabelTemplate};
use rxlabel::writer::{FontSources, PdfWriterConfig};
use rxlabel::{build_labels, render_with_sources, Error, LabelMode, LabelRange, Table};
use std::path::Path;

/// Any TrueType font that covers Latin-1; used as the fallback CJK slot.
const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

const ORDERS_CSV: &str = "\
Order ID,Bundle ID,Line Item,Quantity,Customer Name,OD SPH,OS SPH,OD AXIS,PD
2001,1,Round Frame,1,Ann Lee,-1.5,-1.75,89.6,63
2001,1,1.60 Index Lens,1,,,,,
2001,2,Cat Eye Frame,1,,-2,-2,,
2002,1,Square Frame,1,Zoë Martin,+1,+1,,
";

fn labels(start: usize, limit: usize) -> Vec<rxlabel::LabelData> {
    let table = Table::from_csv_reader(ORDERS_CSV.as_bytes()).unwrap();
    build_labels(&table, LabelMode::Bundle, LabelRange::new(start, limit))
        .unwrap()
        .labels
}

fn plain() -> PdfWriterConfig {
    PdfWriterConfig::default().with_compress(false)
}

#[test]
fn test_latin_labels_render_without_embedding() {
    let pdf = render_with_sources(&labels(0, 2), &FontSources::new(), &LabelTemplate::default(), &plain())
        .unwrap();
    let content = String::from_utf8_lossy(&pdf);

    assert!(content.starts_with("%PDF-1.7"));
    assert!(content.contains("/Count 2"));
    assert!(content.contains("/BaseFont /Helvetica"));
    assert!(!content.contains("/FontFile2"));
    assert!(content.contains("(Ann Lee) Tj"));
    assert!(content.contains("(-1.50) Tj"));
    assert!(content.contains("(90) Tj"));
    assert!(content.contains("(31.50) Tj"));
    assert!(content.contains("(Bundle 2/2) Tj"));
    assert!(content.ends_with("%%EOF"));
}

#[test]
fn test_xref_offsets_point_at_objects() {
    let pdf = render_with_sources(&labels(0, 2), &FontSources::new(), &LabelTemplate::default(), &plain())
        .unwrap();

    let marker = b"startxref\n";
    let at = pdf.windows(marker.len()).rposition(|w| w == marker).unwrap();
    let tail = std::str::from_utf8(&pdf[at + marker.len()..]).unwrap();
    let xref_at: usize = tail.lines().next().unwrap().trim().parse().unwrap();
    assert!(pdf[xref_at..].starts_with(b"xref\n"));

    let table = std::str::from_utf8(&pdf[xref_at..]).unwrap();
    let entries: Vec<&str> = table.lines().skip(3).take_while(|l| l.ends_with(" n ")).collect();
    assert!(!entries.is_empty());
    for (i, entry) in entries.iter().enumerate() {
        let offset: usize = entry[..10].parse().unwrap();
        let header = format!("{} 0 obj", i + 1);
        assert!(pdf[offset..].starts_with(header.as_bytes()), "object {}", i + 1);
    }
}

#[test]
fn test_fallback_characters_embed_a_type0_font() {
    if !Path::new(SYSTEM_FONT).exists() {
        return;
    }
    let sources = FontSources::new().with_font(FontSlot::SimplifiedChinese, SYSTEM_FONT);
    let pdf = render_with_sources(&labels(2, 1), &sources, &LabelTemplate::default(), &plain()).unwrap();
    let content = String::from_utf8_lossy(&pdf);

    assert!(content.contains("/Subtype /Type0"));
    assert!(content.contains("/Encoding /Identity-H"));
    assert!(content.contains("/Subtype /CIDFontType2"));
    assert!(content.contains("/CIDToGIDMap /Identity"));
    assert!(content.contains("/FontFile2"));
    assert!(content.contains("/Length1"));
    assert!(content.contains("/F2 "));
    // ToUnicode maps the drawn glyph back to U+00EB
    assert!(content.contains("<00EB>"));
}

#[test]
fn test_missing_script_font_reported_before_loading() {
    let table = Table::from_csv_reader(
        "Order ID,Bundle ID,Line Item,Quantity,Customer Name\n3001,1,Frame,1,さくら\n".as_bytes(),
    )
    .unwrap();
    let batch = build_labels(&table, LabelMode::Bundle, LabelRange::default()).unwrap();
    // The Korean file does not exist, but Korean text is never requested
    let sources = FontSources::new().with_font(FontSlot::Korean, "/nonexistent/kr.ttf");
    let err = render_with_sources(&batch.labels, &sources, &LabelTemplate::default(), &plain()).unwrap_err();
    match err {
        Error::FontUnavailable { code, script } => {
            assert_eq!(code, 'さ' as u32);
            assert_eq!(script, "Japanese");
        },
        other => panic!("expected unavailable font, got {:?}", other),
    }
}

#[test]
fn test_size_limit_is_validation_error() {
    let config = plain().with_max_bytes(512);
    let err = render_with_sources(&labels(0, 2), &FontSources::new(), &LabelTemplate::default(), &config);
    match err {
        Err(e @ Error::DocumentTooLarge { .. }) => assert!(e.is_validation()),
        other => panic!("expected size error, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_empty_window_renders_empty_document() {
    let pdf = render_with_sources(&labels(3, 10), &FontSources::new(), &LabelTemplate::default(), &plain())
        .unwrap();
    let content = String::from_utf8_lossy(&pdf);
    assert!(content.contains("/Count 0"));
}
