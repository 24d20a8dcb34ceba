//! Unified error types for gfx_font

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for font loading, saving and editing operations
#[derive(Debug, Error)]
pub enum FontError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Attaches the file name to an error raised while loading or saving a file.
    #[error("[{path}] {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<FontError>,
    },

    // === Syntax Errors (text formats) ===
    #[error("[line:{line}] Expected '{expected}', found '{found}'")]
    UnexpectedToken { line: usize, expected: String, found: String },

    #[error("[line:{line}] Expected number, found '{found}'")]
    ExpectedNumber { line: usize, found: String },

    #[error("[line:{line}] Unexpected end of file")]
    UnexpectedEof { line: usize },

    #[error("[line:{line}] {message}")]
    Malformed { line: usize, message: String },

    // === Binary Errors ===
    #[error("Unexpected end of data while reading {what}")]
    Truncated { what: String },

    #[error("Invalid binary font header: {message}")]
    InvalidHeader { message: String },

    #[error("Glyph code range is not contiguous: first 0x{first:04X}, last 0x{last:04X}")]
    NotContiguous { first: u16, last: u16 },

    // === Saving Errors ===
    #[error("Font must be flattened before saving in {format} format")]
    NotFlat { format: String },

    #[error("Refusing to save a font without glyphs")]
    EmptyFont,

    #[error("{field} value {value} does not fit the {format} format")]
    ValueOutOfRange { format: String, field: String, value: i64 },

    #[error("Unsupported format: {description}")]
    UnsupportedFormat { description: String },

    #[error("Format '{name}' does not support {operation}")]
    FormatNotSupported { name: String, operation: String },

    // === External Errors ===
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Font parsing error: {0}")]
    Yaff(#[from] libyaff::ParseError),
}

/// Result type alias for gfx_font operations
pub type Result<T> = std::result::Result<T, FontError>;

// === Convenience constructors ===
impl FontError {
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed { line, message: message.into() }
    }

    pub fn unexpected_token(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn truncated(what: impl Into<String>) -> Self {
        Self::Truncated { what: what.into() }
    }

    pub fn not_flat(format: impl std::fmt::Display) -> Self {
        Self::NotFlat { format: format.to_string() }
    }

    pub fn out_of_range(format: impl std::fmt::Display, field: impl Into<String>, value: i64) -> Self {
        Self::ValueOutOfRange {
            format: format.to_string(),
            field: field.into(),
            value,
        }
    }

    /// Wraps the error with the file it happened in, unless it already carries one.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::InFile { .. } => self,
            other => Self::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The line number for syntax errors, looking through file context.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InFile { source, .. } => source.line(),
            Self::UnexpectedToken { line, .. } | Self::ExpectedNumber { line, .. } | Self::UnexpectedEof { line } | Self::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }
}
