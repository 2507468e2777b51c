//! Error types for the label toolkit.
//!
//! Every fallible operation in the crate reports one of these variants. Each
//! variant belongs to an [`ErrorKind`] so the calling layer can map failures
//! to a client error (bad input) or an internal error (missing resources).

/// Result type alias for label toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied input that cannot be processed (400-equivalent)
    Validation,
    /// A resource needed to finish the request is unavailable (500-equivalent)
    Resource,
}

/// Error types that can occur while aggregating or labeling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input table contains no rows
    #[error("Input contains no rows")]
    EmptyInput,

    /// A required column is absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Pagination window is malformed or out of bounds
    #[error("Invalid label range: {0}")]
    InvalidRange(String),

    /// Table looks aggregated but the bundle column blocks are unusable
    #[error("Ambiguous aggregated table: {0}")]
    AmbiguousTable(String),

    /// Column drop configuration could not be used
    #[error("Invalid drop configuration: {0}")]
    InvalidDropConfig(String),

    /// Rendered document exceeds the configured size limit
    #[error("Document size {size} bytes exceeds limit of {limit} bytes; request a smaller range")]
    DocumentTooLarge {
        /// Size of the rendered document in bytes
        size: usize,
        /// Configured maximum in bytes
        limit: usize,
    },

    /// No loaded font can draw a character
    #[error("No font available for character U+{code:04X} ({script})")]
    FontUnavailable {
        /// Code point of the offending character
        code: u32,
        /// Script the character was classified as
        script: &'static str,
    },

    /// A font file could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding or encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding error (drop lists)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput
            | Error::MissingColumn(_)
            | Error::InvalidRange(_)
            | Error::AmbiguousTable(_)
            | Error::InvalidDropConfig(_)
            | Error::DocumentTooLarge { .. }
            | Error::Csv(_)
            | Error::Json(_) => ErrorKind::Validation,
            Error::FontUnavailable { .. } | Error::Font(_) | Error::Io(_) => ErrorKind::Resource,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
