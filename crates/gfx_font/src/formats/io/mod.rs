//! Codec implementations for the supported font formats.
//!
//! These are reached through `FontFormat::codec()`, `FontFormat::from_bytes()` and
//! `FontFormat::to_bytes()`.

mod adafruit_header;
mod bdf;
mod binary;
mod draw;
mod tokenizer;
pub(crate) mod xml;
mod yaff;

pub(crate) use adafruit_header::AdafruitHeaderCodec;
pub(crate) use bdf::BdfCodec;
pub(crate) use binary::BinaryCodec;
pub(crate) use draw::DrawCodec;
pub(crate) use xml::XmlCodec;
pub(crate) use yaff::YaffCodec;

/// `'c' ` annotation for printable ASCII codes, empty otherwise.
pub(crate) fn code_to_char(code: u16) -> String {
    if (0x20..0x7F).contains(&code) {
        format!("'{}' ", code as u8 as char)
    } else {
        String::new()
    }
}

pub(crate) fn to_text(data: &[u8]) -> crate::Result<&str> {
    let text = std::str::from_utf8(data)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
