// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # rxlabel
//!
//! Order CSV aggregation and optical prescription label rendering.
//!
//! ## Core Features
//!
//! ### Aggregation
//! - **Order folding**: line items grouped by `Order ID`, then `Bundle ID`
//! - **Wide tables**: one row per order with `"<Field> (Bundle N)"` blocks and a
//!   `Bundle Count` column
//! - **Field resolution**: first non-empty value across equivalent column names
//! - **Column drops**: a JSON drop list for financial and internal columns
//!
//! ### Labels
//! - **Two input shapes**: raw line items or an aggregated wide table
//! - **Modes**: one label per bundle or one per order
//! - **Pagination**: `[start, start + limit)` windows, at most 300 labels each
//! - **Normalization**: two-decimal Rx values, integral axis, PD derivation,
//!   lens index and coating detection
//!
//! ### Rendering
//! - **Multi-script text**: Latin, Simplified Chinese, Japanese and Korean runs
//!   in one line, each drawn with its own font
//! - **Fitting**: word wrap with ellipsis and shrink-to-fit
//! - **PDF output**: Base-14 Helvetica plus embedded Type 0 CJK fonts, loaded
//!   only when the labels use their script
//!
//! ## Quick Start
//!
//! ```ignore
//! use rxlabel::{aggregate, build_labels, render_with_sources, DropConfig, LabelMode, LabelRange, Table};
//! use rxlabel::layout::LabelTemplate;
//! use rxlabel::writer::{FontSources, PdfWriterConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Table::from_csv_path("orders.csv")?;
//!
//! // One row per order
//! let wide = aggregate(&table, &DropConfig::new())?;
//! wide.write_csv(std::io::stdout())?;
//!
//! // First 50 bundle labels as PDF
//! let batch = build_labels(&table, LabelMode::Bundle, LabelRange::new(0, 50))?;
//! let sources = FontSources::new().with_font(rxlabel::layout::FontSlot::Japanese, "NotoSansJP.ttf");
//! let pdf = render_with_sources(&batch.labels, &sources, &LabelTemplate::default(), &PdfWriterConfig::default())?;
//! std::fs::write("labels.pdf", pdf)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Tabular data
pub mod table;

// Aggregation
pub mod aggregate;
pub mod columns;
pub mod reader;
pub mod resolve;

// Labels
pub mod label;

// Layout and fonts
pub mod fonts;
pub mod layout;

// PDF writing
pub mod object;
pub mod render;
pub mod writer;

// Re-exports
pub use aggregate::{aggregate, fold_table, OrderMap};
pub use config::{DropConfig, DropList, DropMode, MAX_LABEL_LIMIT};
pub use error::{Error, ErrorKind, Result};
pub use label::{build_all_labels, build_labels, LabelBatch, LabelData, LabelMode, LabelRange};
pub use render::{render_labels, render_with_sources};
pub use table::{Row, Table};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
