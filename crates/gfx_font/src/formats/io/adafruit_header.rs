use super::super::{FontCodec, LoadOptions, SaveOptions};
use super::tokenizer::Tokenizer;
use super::{code_to_char, to_text};
use crate::{Font, FontError, Glyph, GlyphStatus, Result, sanitize_identifier};

// Adafruit GFX font header, as written by fontconvert:
//
// const uint8_t NameBitmaps[] PROGMEM = { 0x00, ... };
// const GFXglyph NameGlyphs[] PROGMEM = {
//   { bitmapOffset, width, height, xAdvance, xOffset, yOffset }, ... };
// const GFXfont Name PROGMEM = { (uint8_t *)NameBitmaps, (GFXglyph *)NameGlyphs, first, last, yAdvance };
//
// Glyph bitmaps are packed continuously without row padding. A glyph's data runs up to the
// next glyph's bitmapOffset.

const GLYPH_FIELDS: usize = 6;
const FONT_FIELDS: usize = 3;

pub(crate) struct AdafruitHeaderCodec;

impl FontCodec for AdafruitHeaderCodec {
    fn load(&self, data: &[u8], _options: &LoadOptions) -> Result<Font> {
        load_header(to_text(data)?)
    }

    fn save(&self, font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> Result<Vec<u8>> {
        Ok(save_header(font, options, fallback_name).into_bytes())
    }
}

struct GlyphEntry {
    line: usize,
    values: [i32; GLYPH_FIELDS],
}

fn glyph_list(tok: &mut Tokenizer) -> Result<Vec<GlyphEntry>> {
    let mut entries = Vec::new();
    while !tok.peek_is("}")? {
        tok.expect("{")?;
        let line = tok.line();
        let values = tok.number_list()?;
        tok.expect("}")?;
        let Ok(values) = <[i32; GLYPH_FIELDS]>::try_from(&values[..GLYPH_FIELDS.min(values.len())]) else {
            return Err(FontError::malformed(
                line,
                format!("glyph entry needs {GLYPH_FIELDS} values, found {}", values.len()),
            ));
        };
        entries.push(GlyphEntry { line, values });
        if !tok.optional(",")? {
            break;
        }
    }
    Ok(entries)
}

fn pointer_cast(tok: &mut Tokenizer, type_name: &str) -> Result<()> {
    if tok.optional("(")? {
        tok.expect_all(&[type_name, "*", ")"])?;
    }
    Ok(())
}

pub(crate) fn load_header(text: &str) -> Result<Font> {
    let mut tok = Tokenizer::new(text);

    tok.expect_all(&["const", "uint8_t"])?;
    let bitmap_name = tok.next_token()?;
    tok.expect_all(&["[", "]"])?;
    tok.optional("PROGMEM")?;
    tok.expect_all(&["=", "{"])?;
    let bitmap = tok.byte_list()?;
    tok.expect_all(&["}", ";"])?;

    tok.expect_all(&["const", "GFXglyph"])?;
    let glyph_name = tok.next_token()?;
    tok.expect_all(&["[", "]"])?;
    tok.optional("PROGMEM")?;
    tok.expect_all(&["=", "{"])?;
    let entries = glyph_list(&mut tok)?;
    tok.expect_all(&["}", ";"])?;

    tok.expect("const")?;
    tok.expect("GFXfont")?;
    let font_name = tok.next_token()?;
    tok.optional("PROGMEM")?;
    tok.expect_all(&["=", "{"])?;
    pointer_cast(&mut tok, "uint8_t")?;
    tok.expect(&bitmap_name)?;
    tok.expect(",")?;
    pointer_cast(&mut tok, "GFXglyph")?;
    tok.expect(&glyph_name)?;
    tok.expect(",")?;
    let font_line = tok.line();
    let values = tok.number_list()?;
    tok.expect_all(&["}", ";"])?;
    if values.len() < FONT_FIELDS {
        return Err(FontError::malformed(
            font_line,
            format!("font '{font_name}' needs first, last and yAdvance, found {} values", values.len()),
        ));
    }
    let (first, last, y_advance) = (values[0], values[1], values[2]);
    if first < 0 {
        return Err(FontError::malformed(font_line, format!("invalid first code {first}")));
    }
    let expected_last = first as i64 + entries.len() as i64 - 1;
    if last as i64 != expected_last {
        log::warn!("font '{font_name}' declares last code 0x{last:02X} but {} glyphs end at 0x{expected_last:02X}", entries.len());
    }

    let mut font = Font::new(y_advance);
    font.properties = tok.into_properties();
    for (i, entry) in entries.iter().enumerate() {
        let [offset, width, height, x_advance, x_offset, y_offset] = entry.values;
        if width < 0 || height < 0 {
            return Err(FontError::malformed(entry.line, format!("negative glyph size {width}x{height}")));
        }
        let end = entries.get(i + 1).map_or(bitmap.len() as i64, |next| next.values[0] as i64);
        if offset < 0 || end < offset as i64 || end > bitmap.len() as i64 {
            return Err(FontError::malformed(
                entry.line,
                format!("glyph bitmap range {offset}..{end} outside of the {} byte bitmap array", bitmap.len()),
            ));
        }
        let data = &bitmap[offset as usize..end as usize];
        let required = crate::SparseMap::required_bytes(width, height);
        if data.len() < required {
            return Err(FontError::malformed(
                entry.line,
                format!("glyph {width}x{height} needs {required} bitmap bytes, found {}", data.len()),
            ));
        }

        let mut glyph = Glyph::from_packed(data, width, height, x_offset, y_offset, x_advance);
        let code = first as u32 + i as u32;
        if code < Glyph::UNASSIGNED as u32 {
            glyph.code = code as u16;
        } else {
            glyph.code = Glyph::UNASSIGNED;
            glyph.status = GlyphStatus::Error;
        }
        font.add(glyph);
    }
    Ok(font)
}

pub(crate) fn save_header(font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> String {
    let name = match options.font_name.as_deref() {
        Some(name) => sanitize_identifier(name),
        None => font.identifier(fallback_name),
    };

    let mut result = String::new();
    result.push_str("#pragma once\n");
    result.push_str("#include <Adafruit_GFX.h>\n");

    let props = &font.properties;
    if !props.is_empty() {
        result.push_str("/* PROPERTIES\n\n");
        if let Some(font_name) = &props.font_name {
            result.push_str(&format!("FONT_NAME {font_name}\n"));
        }
        if let Some(size) = props.pixel_size {
            result.push_str(&format!("PIXEL_SIZE {size}\n"));
        }
        if let Some(ascent) = props.ascent {
            result.push_str(&format!("FONT_ASCENT {ascent}\n"));
        }
        if let Some(descent) = props.descent {
            result.push_str(&format!("FONT_DESCENT {descent}\n"));
        }
        result.push_str("*/\n");
    }

    result.push_str(&format!("const uint8_t {name}Bitmaps[] PROGMEM = {{\n"));
    let mut offsets = Vec::with_capacity(font.len());
    let mut offset = 0;
    for glyph in font.glyphs() {
        let data = glyph.packed_bytes();
        offsets.push(offset);
        offset += data.len();
        result.push_str(&format!("/* {}0x{:02X} */ ", code_to_char(glyph.code), glyph.code));
        for b in data {
            result.push_str(&format!("0x{b:02X}, "));
        }
        result.push('\n');
    }
    result.push_str("};\n\n");

    result.push_str(&format!("const GFXglyph {name}Glyphs[] PROGMEM = {{\n"));
    for (glyph, offset) in font.glyphs().iter().zip(offsets) {
        result.push_str(&format!(
            "/* {}0x{:02X} */ {{{offset:6}, {:4},{:4},{:4},{:4},{:5} }},\n",
            code_to_char(glyph.code),
            glyph.code,
            glyph.width(),
            glyph.height(),
            glyph.x_advance,
            glyph.x_offset(),
            glyph.y_offset()
        ));
    }
    result.push_str("};\n\n");

    result.push_str(&format!("const GFXfont {name} PROGMEM = {{\n"));
    result.push_str(&format!("(uint8_t*){name}Bitmaps,\n"));
    result.push_str(&format!("(GFXglyph*){name}Glyphs,\n"));
    result.push_str(&format!("0x{:02X}, 0x{:02X}, {} \n", font.start_code(), font.end_code(), font.y_advance));
    result.push_str("};\n");
    result
}
