//! Multi-script label layout.
//!
//! This module turns label text into positioned draw operations:
//! - Script classification (Latin, Simplified Chinese, Japanese, Korean)
//! - Font-run segmentation and measurement
//! - Left, centered, wrapped and shrink-to-fit drawing
//! - The prescription label template

pub mod metrics;
pub mod runs;
pub mod script;
pub mod template;
pub mod text;

// Re-export main types
pub use metrics::{FontSet, GlyphMetrics};
pub use runs::{measure, segment, TextRun};
pub use script::{classify, FontSlot, ScriptUsage};
pub use template::LabelTemplate;
pub use text::{DrawOp, LabelCanvas, ELLIPSIS};
