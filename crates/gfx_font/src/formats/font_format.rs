//! Font file format definitions.
//!
//! This module defines the supported font formats for loading and saving and maps
//! them to their codec implementations.

use std::path::Path;

use super::{FontCodec, io};

/// Supported font file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    /// Adafruit GFX C header as produced by `fontconvert`
    /// Extension: .h
    AdafruitHeader,

    /// Glyph Bitmap Distribution Format 2.1
    /// Extension: .bdf
    Bdf,

    /// In-memory image of the GFXfont structures (32 bit pointers)
    /// Extension: .gfxfntb
    Binary,

    /// XML serialization, lossless and usable for unflattened fonts
    /// Extension: .gfxfntx
    Xml,

    /// YAFF (Yet Another Font Format) - text-based bitmap font format
    /// Extension: .yaff
    Yaff,

    /// Hexdraw text format, load only
    /// Extension: .draw
    Draw,
}

impl FontFormat {
    /// All registered formats, in file dialog order.
    pub const ALL: [FontFormat; 6] = [
        FontFormat::AdafruitHeader,
        FontFormat::Bdf,
        FontFormat::Binary,
        FontFormat::Xml,
        FontFormat::Yaff,
        FontFormat::Draw,
    ];

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::AdafruitHeader => "h",
            Self::Bdf => "bdf",
            Self::Binary => "gfxfntb",
            Self::Xml => "gfxfntx",
            Self::Yaff => "yaff",
            Self::Draw => "draw",
        }
    }

    /// Try to detect the format from a file extension.
    ///
    /// Accepts extensions with or without leading dot.
    ///
    /// # Examples
    /// ```
    /// use gfx_font::formats::FontFormat;
    ///
    /// assert_eq!(FontFormat::from_extension("h"), Some(FontFormat::AdafruitHeader));
    /// assert_eq!(FontFormat::from_extension(".BDF"), Some(FontFormat::Bdf));
    /// assert_eq!(FontFormat::from_extension("gfxfntb"), Some(FontFormat::Binary));
    /// assert_eq!(FontFormat::from_extension("ttf"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Try to detect the format from a file path.
    ///
    /// # Examples
    /// ```
    /// use gfx_font::formats::FontFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(FontFormat::from_path(Path::new("FreeSans9pt7b.h")), Some(FontFormat::AdafruitHeader));
    /// assert_eq!(FontFormat::from_path(Path::new("fonts/6x13.bdf")), Some(FontFormat::Bdf));
    /// assert_eq!(FontFormat::from_path(Path::new("noext")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    /// Get all extensions for file dialogs.
    pub fn all_extensions() -> &'static [&'static str] {
        &["h", "bdf", "gfxfntb", "gfxfntx", "yaff", "draw"]
    }

    /// Get a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AdafruitHeader => "Adafruit GFX Header",
            Self::Bdf => "BDF",
            Self::Binary => "GFX Binary",
            Self::Xml => "GFX XML",
            Self::Yaff => "YAFF",
            Self::Draw => "Hexdraw",
        }
    }

    /// Get a description of this format.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AdafruitHeader => "Adafruit GFX font C header (fontconvert output)",
            Self::Bdf => "Glyph Bitmap Distribution Format 2.1",
            Self::Binary => "GFXfont memory image (bitmap, glyph table, 13 byte header)",
            Self::Xml => "XML font, keeps unflattened code sequences",
            Self::Yaff => "Yet Another Font Format (text-based)",
            Self::Draw => "Hexdraw text font (load only)",
        }
    }

    /// Formats that can't represent gaps or duplicate codes.
    pub fn requires_flat_font(&self) -> bool {
        matches!(self, Self::AdafruitHeader | Self::Bdf | Self::Binary)
    }

    pub fn supports_save(&self) -> bool {
        !matches!(self, Self::Draw)
    }

    /// The codec implementing this format.
    pub fn codec(&self) -> &'static dyn FontCodec {
        match self {
            Self::AdafruitHeader => &io::AdafruitHeaderCodec,
            Self::Bdf => &io::BdfCodec,
            Self::Binary => &io::BinaryCodec,
            Self::Xml => &io::XmlCodec,
            Self::Yaff => &io::YaffCodec,
            Self::Draw => &io::DrawCodec,
        }
    }
}

impl std::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
