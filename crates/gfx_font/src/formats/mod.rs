//! Loading and saving fonts.
//!
//! Every [`FontFormat`] maps to a [`FontCodec`]. [`load_file`] and [`save_file`] pick the
//! format from the file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Font, FontError, Result};

pub(crate) mod io;
pub use io::xml::{glyphs_from_xml_str, glyphs_to_xml_string};

mod font_format;
pub use font_format::*;

/// Glyph ceiling applied after loading.
pub const DEFAULT_MAX_GLYPHS: usize = 2048;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Fonts with more glyphs are truncated after loading.
    pub max_glyphs: Option<usize>,
    /// Flatten the code sequence after loading.
    pub flatten: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_glyphs: Some(DEFAULT_MAX_GLYPHS),
            flatten: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Name used for C identifiers and font name records, overrides the font properties.
    pub font_name: Option<String>,
}

/// A load/save implementation for one file format.
pub trait FontCodec: Sync {
    fn load(&self, data: &[u8], options: &LoadOptions) -> Result<Font>;

    /// Serializes `font`; `fallback_name` names the font if neither the options nor the
    /// properties do (usually the target file stem).
    fn save(&self, font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> Result<Vec<u8>>;
}

impl FontFormat {
    /// Decodes a font and applies the flatten and glyph limit options.
    pub fn from_bytes(&self, data: &[u8], options: &LoadOptions) -> Result<Font> {
        let mut font = self.codec().load(data, options)?;
        finish_load(&mut font, options);
        Ok(font)
    }

    /// Encodes a font. Empty fonts and save-less formats are rejected.
    pub fn to_bytes(&self, font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> Result<Vec<u8>> {
        if !self.supports_save() {
            return Err(FontError::FormatNotSupported {
                name: self.name().to_string(),
                operation: "saving".to_string(),
            });
        }
        if font.is_empty() {
            return Err(FontError::EmptyFont);
        }
        if self.requires_flat_font() && !font.is_flat() {
            return Err(FontError::not_flat(self));
        }
        self.codec().save(font, options, fallback_name)
    }
}

pub(crate) fn finish_load(font: &mut Font, options: &LoadOptions) {
    if options.flatten && !font.is_flat() {
        font.flatten();
    }
    if let Some(max) = options.max_glyphs {
        if font.len() > max {
            log::warn!("font has {} glyphs, truncating to {max}", font.len());
            font.truncate(max);
        }
    }
}

fn format_for(path: &Path) -> Result<FontFormat> {
    FontFormat::from_path(path).ok_or_else(|| FontError::UnsupportedFormat {
        description: path
            .extension()
            .map_or_else(|| "file without extension".to_string(), |e| format!(".{}", e.to_string_lossy())),
    })
}

/// Loads a font, choosing the codec by file extension.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Font> {
    let format = format_for(path)?;
    let data = std::fs::read(path).map_err(|e| FontError::from(e).in_file(path))?;
    let mut font = format.from_bytes(&data, options).map_err(|e| e.in_file(path))?;
    font.path = Some(path.to_path_buf());
    log::info!("loaded {} glyphs from {} ({})", font.len(), path.display(), format);
    Ok(font)
}

/// Saves a font, choosing the codec by file extension. The file stem serves as default font name.
pub fn save_file(font: &mut Font, path: &Path, options: &SaveOptions) -> Result<()> {
    let format = format_for(path)?;
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string());
    let data = format.to_bytes(font, options, stem.as_deref()).map_err(|e| e.in_file(path))?;
    std::fs::write(path, data).map_err(|e| FontError::from(e).in_file(path))?;
    font.path = Some(path.to_path_buf());
    log::info!("saved {} glyphs to {} ({})", font.len(), path.display(), format);
    Ok(())
}
