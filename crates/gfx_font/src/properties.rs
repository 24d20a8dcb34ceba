use serde::{Deserialize, Serialize};

/// Optional metadata carried by the BDF and header formats.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontProperties {
    pub font_name: Option<String>,
    pub pixel_size: Option<i32>,
    pub ascent: Option<i32>,
    pub descent: Option<i32>,
}

impl FontProperties {
    pub fn is_empty(&self) -> bool {
        self.font_name.is_none() && self.pixel_size.is_none() && self.ascent.is_none() && self.descent.is_none()
    }
}

/// Turns an arbitrary name into a C identifier.
///
/// ```
/// use gfx_font::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("FreeSans 9pt-7b"), "FreeSans_9pt_7b");
/// assert_eq!(sanitize_identifier("5x7"), "_5x7");
/// assert_eq!(sanitize_identifier(""), "GfxFont");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    let mut result: String = name.trim().chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    if result.is_empty() {
        return "GfxFont".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}
