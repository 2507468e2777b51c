//! PDF document writer for label batches.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer. Each label is one page; text runs
//! arrive as [`DrawOp`]s already positioned by the layout engine.

use super::content_stream::{ContentStreamBuilder, ContentStreamOp};
use super::font_manager::{EmbeddedFont, LabelFont};
use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::fonts::GlyphUsage;
use crate::layout::{DrawOp, FontSet, FontSlot, GlyphMetrics};
use crate::object::{Dictionary, Object};
use std::collections::BTreeMap;
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress streams
    pub compress: bool,
    /// Largest document `finish` may return, in bytes
    pub max_bytes: Option<usize>,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some("rxlabel".to_string()),
            compress: true,
            max_bytes: None,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, content streams and embedded font files are compressed
    /// using FlateDecode (zlib/deflate).
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Limit the size of the finished document.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Internal page data.
struct PageData {
    width: f32,
    height: f32,
    content: Vec<u8>,
}

/// PDF writer that turns laid-out labels into pages.
pub struct LabelPdfWriter {
    config: PdfWriterConfig,
    fonts: FontSet<LabelFont>,
    /// Glyphs drawn per embedded slot
    usage: BTreeMap<FontSlot, GlyphUsage>,
    pages: Vec<PageData>,
}

impl LabelPdfWriter {
    /// Create a writer drawing with `fonts`.
    pub fn new(config: PdfWriterConfig, fonts: FontSet<LabelFont>) -> Self {
        Self {
            config,
            fonts,
            usage: BTreeMap::new(),
            pages: Vec::new(),
        }
    }

    /// Fonts used by this writer.
    pub fn fonts(&self) -> &FontSet<LabelFont> {
        &self.fonts
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page and draw `ops` on it. `top` coordinates are flipped into
    /// PDF user space (origin bottom-left).
    pub fn add_page(&mut self, width: f32, height: f32, ops: &[DrawOp]) -> Result<()> {
        let mut builder = ContentStreamBuilder::new();
        builder
            .op(ContentStreamOp::SaveState)
            .op(ContentStreamOp::SetFillGray(0.0))
            .op(ContentStreamOp::SetStrokeGray(0.0));

        for op in ops {
            match op {
                DrawOp::Text {
                    text,
                    slot,
                    size,
                    x,
                    top,
                } => {
                    let font = self.fonts.get(*slot).ok_or_else(|| {
                        Error::Font(format!("no font loaded for {} text", slot.script_name()))
                    })?;
                    builder.set_font(slot.resource_name(), *size);
                    match font {
                        LabelFont::Standard(_) => {
                            builder.text(&win_ansi_bytes(text), *x, height - top);
                        },
                        LabelFont::Embedded(embedded) => {
                            if let Some(missing) = text.chars().find(|ch| !font.has_glyph(*ch)) {
                                log::warn!(
                                    "{} has no glyph for U+{:04X}; drawing .notdef",
                                    embedded.name(),
                                    missing as u32
                                );
                            }
                            let usage = self.usage.entry(*slot).or_default();
                            usage.use_string(text, |cp| embedded.font().glyph_id(cp));
                            builder.glyphs(embedded.glyph_ids(text), *x, height - top);
                        },
                    }
                },
                DrawOp::Line { top, x1, x2, width } => {
                    builder.hline(*x1, *x2, height - top, *width);
                },
            }
        }

        builder.end_text();
        builder.op(ContentStreamOp::RestoreState);
        let content = builder.build()?;
        self.pages.push(PageData {
            width,
            height,
            content,
        });
        Ok(())
    }

    fn stream(&self, mut entries: Vec<(&str, Object)>, data: Vec<u8>) -> Result<Object> {
        if self.config.compress {
            entries.push(("Filter", Object::name("FlateDecode")));
            return Ok(Object::stream(entries, compress_data(&data)?));
        }
        Ok(Object::stream(entries, data))
    }

    /// Write the Type 0 font objects for one embedded slot; returns the id of
    /// the Type 0 font dictionary.
    fn embed_font(
        &self,
        objects: &mut Vec<Object>,
        font: &EmbeddedFont,
        usage: &GlyphUsage,
    ) -> Result<u32> {
        let ttf = font.font();
        let metrics = ttf.metrics();
        let base_font = metrics.name.clone();

        let file_id = push(
            objects,
            self.stream(
                vec![("Length1", Object::Integer(ttf.raw_data().len() as i64))],
                ttf.raw_data().to_vec(),
            )?,
        );

        let (llx, lly, urx, ury) = metrics.bbox;
        let descriptor_id = push(
            objects,
            Object::dict(vec![
                ("Type", Object::name("FontDescriptor")),
                ("FontName", Object::name(&base_font)),
                ("Flags", Object::Integer(metrics.flags as i64)),
                (
                    "FontBBox",
                    Object::Array(vec![
                        Object::Integer(llx as i64),
                        Object::Integer(lly as i64),
                        Object::Integer(urx as i64),
                        Object::Integer(ury as i64),
                    ]),
                ),
                ("ItalicAngle", Object::Integer(0)),
                ("Ascent", Object::Integer(metrics.ascender as i64)),
                ("Descent", Object::Integer(metrics.descender as i64)),
                ("CapHeight", Object::Integer(metrics.cap_height as i64)),
                ("StemV", Object::Integer(metrics.stem_v as i64)),
                ("FontFile2", Object::reference(file_id)),
            ]),
        );

        let cid_font_id = push(
            objects,
            Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("CIDFontType2")),
                ("BaseFont", Object::name(&base_font)),
                (
                    "CIDSystemInfo",
                    Object::dict(vec![
                        ("Registry", Object::text("Adobe")),
                        ("Ordering", Object::text("Identity")),
                        ("Supplement", Object::Integer(0)),
                    ]),
                ),
                ("FontDescriptor", Object::reference(descriptor_id)),
                ("DW", Object::Integer(1000)),
                ("W", usage.widths_array(|gid| ttf.glyph_width(gid))),
                ("CIDToGIDMap", Object::name("Identity")),
            ]),
        );

        let to_unicode_id = push(
            objects,
            self.stream(Vec::new(), usage.tounicode_cmap().into_bytes())?,
        );

        Ok(push(
            objects,
            Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type0")),
                ("BaseFont", Object::name(&base_font)),
                ("Encoding", Object::name("Identity-H")),
                ("DescendantFonts", Object::Array(vec![Object::reference(cid_font_id)])),
                ("ToUnicode", Object::reference(to_unicode_id)),
            ]),
        ))
    }

    /// Build the complete PDF document.
    pub fn finish(self) -> Result<Vec<u8>> {
        // Object n lives at objects[n - 1]
        let mut objects: Vec<Object> = Vec::new();
        let catalog_id = push(&mut objects, Object::Null);
        let pages_id = push(&mut objects, Object::Null);

        let mut font_resources = Dictionary::new();
        let helvetica_id = push(
            &mut objects,
            Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type1")),
                ("BaseFont", Object::name("Helvetica")),
                ("Encoding", Object::name("WinAnsiEncoding")),
            ]),
        );
        font_resources.insert(
            FontSlot::Latin.resource_name().to_string(),
            Object::reference(helvetica_id),
        );

        for (slot, usage) in &self.usage {
            if let Some(LabelFont::Embedded(font)) = self.fonts.get(*slot) {
                let font_id = self.embed_font(&mut objects, font, usage)?;
                log::debug!(
                    "Embedded {} font {} ({} glyphs used)",
                    slot.script_name(),
                    font.name(),
                    usage.glyph_count()
                );
                font_resources
                    .insert(slot.resource_name().to_string(), Object::reference(font_id));
            }
        }

        let mut page_refs = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content_id = push(&mut objects, self.stream(Vec::new(), page.content.clone())?);
            let page_id = push(
                &mut objects,
                Object::dict(vec![
                    ("Type", Object::name("Page")),
                    ("Parent", Object::reference(pages_id)),
                    (
                        "MediaBox",
                        Object::rect(0.0, 0.0, page.width as f64, page.height as f64),
                    ),
                    ("Contents", Object::reference(content_id)),
                    (
                        "Resources",
                        Object::dict(vec![("Font", Object::Dictionary(font_resources.clone()))]),
                    ),
                ]),
            );
            page_refs.push(Object::reference(page_id));
        }

        objects[pages_id as usize - 1] = Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Count", Object::Integer(page_refs.len() as i64)),
            ("Kids", Object::Array(page_refs)),
        ]);
        objects[catalog_id as usize - 1] = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::reference(pages_id)),
        ]);
        let info_id = push(&mut objects, self.info_dictionary());

        let output = self.serialize(&objects, catalog_id, info_id)?;
        log::info!("Wrote {} label pages ({} bytes)", self.pages.len(), output.len());

        if let Some(limit) = self.config.max_bytes {
            if output.len() > limit {
                return Err(Error::DocumentTooLarge {
                    size: output.len(),
                    limit,
                });
            }
        }
        Ok(output)
    }

    fn info_dictionary(&self) -> Object {
        let mut entries = Vec::new();
        if let Some(title) = &self.config.title {
            entries.push(("Title", Object::text(title)));
        }
        if let Some(author) = &self.config.author {
            entries.push(("Author", Object::text(author)));
        }
        if let Some(subject) = &self.config.subject {
            entries.push(("Subject", Object::text(subject)));
        }
        if let Some(keywords) = &self.config.keywords {
            entries.push(("Keywords", Object::text(keywords)));
        }
        if let Some(creator) = &self.config.creator {
            entries.push(("Creator", Object::text(creator)));
        }
        let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
        entries.push(("CreationDate", Object::text(&created)));
        Object::dict(entries)
    }

    fn serialize(&self, objects: &[Object], catalog_id: u32, info_id: u32) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let mut output = Vec::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (index, obj) in objects.iter().enumerate() {
            offsets.push(output.len());
            serializer.write_indirect(&mut output, index as u32 + 1, obj)?;
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", objects.len() + 1)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(objects.len() as i64 + 1)),
            ("Root", Object::reference(catalog_id)),
            ("Info", Object::reference(info_id)),
        ]);
        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;
        Ok(output)
    }
}

/// Append an object and return its id.
fn push(objects: &mut Vec<Object>, obj: Object) -> u32 {
    objects.push(obj);
    objects.len() as u32
}

/// Latin runs only hold printable ASCII, which WinAnsi encodes as itself.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
        .collect()
}
