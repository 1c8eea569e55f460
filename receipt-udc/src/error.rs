//! Error types for the UDC printing library

use thiserror::Error;

/// Rejections raised while converting a glyph bitmap to a UDC block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// Source bitmap is neither 8x16 (16 bytes) nor 16x16 (32 bytes)
    #[error("Bitmap not 8x16 or 16x16: {0} bytes")]
    InvalidLength(usize),

    /// Transcoded block does not fit in a font B slot
    #[error("Block too large: {len} bytes, maximum {max}")]
    Oversize { len: usize, max: usize },
}

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Invalid cache or code range configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Glyph for a character could not be turned into a slot definition
    #[error("Glyph for {ch:?} rejected: {source}")]
    Glyph {
        ch: char,
        #[source]
        source: TranscodeError,
    },

    /// Transcoded block rejected by the command builder
    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    /// Malformed glyph table
    #[error("Font error at line {line}: {reason}")]
    Font { line: usize, reason: String },

    /// IO error while writing commands
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Command sink refused the data
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
