//! Label batches to PDF.
//!
//! Font loading is driven by the text actually printed: the window's labels
//! are scanned first, and only the CJK fonts their scripts need are read.

use crate::error::Result;
use crate::label::LabelData;
use crate::layout::{FontSet, LabelTemplate, ScriptUsage};
use crate::writer::{FontSources, LabelFont, LabelPdfWriter, PdfWriterConfig};

/// Scripts used by a set of labels.
pub fn script_usage(labels: &[LabelData]) -> ScriptUsage {
    let mut usage = ScriptUsage::default();
    for label in labels {
        for text in label.text_fields() {
            usage.add(text);
        }
    }
    usage
}

/// Render one page per label with already loaded fonts.
///
/// Fails with [`Error::DocumentTooLarge`](crate::Error::DocumentTooLarge) when
/// the configuration carries a size limit the document exceeds.
pub fn render_labels(
    labels: &[LabelData],
    fonts: FontSet<LabelFont>,
    template: &LabelTemplate,
    config: &PdfWriterConfig,
) -> Result<Vec<u8>> {
    if labels.is_empty() {
        log::warn!("Rendering an empty label window");
    }

    let mut writer = LabelPdfWriter::new(config.clone(), fonts);
    for label in labels {
        let ops = template.layout(label, writer.fonts())?;
        writer.add_page(template.width, template.height, &ops)?;
    }
    writer.finish()
}

/// Scan `labels`, load the fonts they need from `sources`, and render.
pub fn render_with_sources(
    labels: &[LabelData],
    sources: &FontSources,
    template: &LabelTemplate,
    config: &PdfWriterConfig,
) -> Result<Vec<u8>> {
    let usage = script_usage(labels);
    let fonts = sources.load_required(&usage)?;
    log::debug!(
        "Loaded {} font slots for {} labels",
        fonts.iter().count(),
        labels.len()
    );
    render_labels(labels, fonts, template, config)
}
