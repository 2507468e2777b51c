//! PDF writing module for label documents.
//!
//! ## Architecture
//!
//! ```text
//! DrawOp[] (one label, from LabelTemplate::layout)
//!     ↓
//! [LabelPdfWriter::add_page] (ops → content stream bytes, glyph usage)
//!     ↓
//! [LabelPdfWriter::finish] (fonts, pages, info, xref, trailer)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use rxlabel::layout::{FontSet, FontSlot, LabelTemplate};
//! use rxlabel::writer::{LabelFont, LabelPdfWriter, PdfWriterConfig};
//!
//! let fonts = FontSet::new().with(FontSlot::Latin, LabelFont::helvetica());
//! let template = LabelTemplate::default();
//! let ops = template.layout(&label, &fonts)?;
//! let mut writer = LabelPdfWriter::new(PdfWriterConfig::default(), fonts);
//! writer.add_page(template.width, template.height, &ops)?;
//! let bytes = writer.finish()?;
//! ```

mod content_stream;
mod font_manager;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use font_manager::{EmbeddedFont, FontSources, LabelFont, StandardFont};
pub use object_serializer::{escape_literal, format_number, ObjectSerializer};
pub use pdf_writer::{LabelPdfWriter, PdfWriterConfig};
