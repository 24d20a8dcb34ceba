use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::super::{FontCodec, FontFormat, LoadOptions, SaveOptions};
use crate::{Font, FontError, Glyph, Result, SparseMap};

// In-memory image of a compiled GFXfont, assuming 32 bit pointers, little endian:
//
// i32     bitmap       offset of the bitmap array, always 13
// i32     glyph        offset of the glyph array, 13 + bitmap length
// u16     first        first code
// u16     last         last code
// u8      yAdvance
// [u8]    bitmap       packed glyph bitmaps
// [8]     glyph record per code in first..=last:
//           u16 bitmapOffset, u8 width, u8 height, u8 xAdvance, i8 xOffset, i8 yOffset, u8 padding
//
// Codes are implicit, so only flat fonts can be stored.

const HEADER_SIZE: i32 = 13;

pub(crate) struct BinaryCodec;

impl FontCodec for BinaryCodec {
    fn load(&self, data: &[u8], _options: &LoadOptions) -> Result<Font> {
        load_binary(data)
    }

    fn save(&self, font: &Font, _options: &SaveOptions, _fallback_name: Option<&str>) -> Result<Vec<u8>> {
        save_binary(font)
    }
}

struct GlyphRecord {
    offset: u16,
    width: u8,
    height: u8,
    x_advance: u8,
    x_offset: i8,
    y_offset: i8,
}

fn truncated(what: &str) -> impl FnOnce(std::io::Error) -> FontError + '_ {
    move |_| FontError::truncated(what)
}

pub(crate) fn load_binary(data: &[u8]) -> Result<Font> {
    let mut br = Cursor::new(data);

    let bitmap_offset = br.read_i32::<LittleEndian>().map_err(truncated("font header"))?;
    let glyph_offset = br.read_i32::<LittleEndian>().map_err(truncated("font header"))?;
    let first = br.read_u16::<LittleEndian>().map_err(truncated("font header"))?;
    let last = br.read_u16::<LittleEndian>().map_err(truncated("font header"))?;
    let y_advance = br.read_u8().map_err(truncated("font header"))?;

    if bitmap_offset != HEADER_SIZE {
        return Err(FontError::InvalidHeader {
            message: format!("bitmap offset is {bitmap_offset}, expected {HEADER_SIZE}"),
        });
    }
    if glyph_offset < HEADER_SIZE {
        return Err(FontError::InvalidHeader {
            message: format!("glyph offset {glyph_offset} points into the header"),
        });
    }
    if last < first {
        return Err(FontError::NotContiguous { first, last });
    }

    let bitmap_len = (glyph_offset - bitmap_offset) as usize;
    if data.len() - (HEADER_SIZE as usize) < bitmap_len {
        return Err(FontError::truncated("bitmap"));
    }
    let mut bitmap = vec![0; bitmap_len];
    br.read_exact(&mut bitmap).map_err(truncated("bitmap"))?;

    let mut records = Vec::with_capacity((last - first) as usize + 1);
    for code in first..=last {
        let what = format!("glyph record 0x{code:02X}");
        let record = GlyphRecord {
            offset: br.read_u16::<LittleEndian>().map_err(truncated(&what))?,
            width: br.read_u8().map_err(truncated(&what))?,
            height: br.read_u8().map_err(truncated(&what))?,
            x_advance: br.read_u8().map_err(truncated(&what))?,
            x_offset: br.read_i8().map_err(truncated(&what))?,
            y_offset: br.read_i8().map_err(truncated(&what))?,
        };
        br.read_u8().map_err(truncated(&what))?; // padding
        records.push(record);
    }

    let mut font = Font::new(y_advance as i32);
    for (i, record) in records.iter().enumerate() {
        let start = record.offset as usize;
        let end = records.get(i + 1).map_or(bitmap.len(), |next| next.offset as usize);
        let required = SparseMap::required_bytes(record.width as i32, record.height as i32);
        let data = match bitmap.get(start..end) {
            Some(data) if data.len() >= required => data,
            _ => {
                return Err(FontError::truncated(format!("bitmap of glyph 0x{:02X} ({start}..{end})", first as usize + i)));
            }
        };
        let glyph = Glyph::from_packed(
            data,
            record.width as i32,
            record.height as i32,
            record.x_offset as i32,
            record.y_offset as i32,
            record.x_advance as i32,
        );
        font.add(glyph.with_code(first + i as u16));
    }
    Ok(font)
}

fn field<T: TryFrom<i64>>(field: &str, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| FontError::out_of_range(FontFormat::Binary, field, value))
}

pub(crate) fn save_binary(font: &Font) -> Result<Vec<u8>> {
    if !font.is_flat() {
        return Err(FontError::not_flat(FontFormat::Binary));
    }
    let bitmaps: Vec<Vec<u8>> = font.glyphs().iter().map(Glyph::packed_bytes).collect();
    let bitmap_len: usize = bitmaps.iter().map(Vec::len).sum();

    let mut result = Vec::with_capacity(HEADER_SIZE as usize + bitmap_len + 8 * font.len());
    result.write_i32::<LittleEndian>(HEADER_SIZE)?;
    result.write_i32::<LittleEndian>(field("glyph offset", HEADER_SIZE as i64 + bitmap_len as i64)?)?;
    result.write_u16::<LittleEndian>(font.start_code())?;
    result.write_u16::<LittleEndian>(font.end_code())?;
    result.write_u8(field("yAdvance", font.y_advance as i64)?)?;

    for data in &bitmaps {
        result.extend_from_slice(data);
    }

    let mut offset = 0;
    for (glyph, data) in font.glyphs().iter().zip(&bitmaps) {
        result.write_u16::<LittleEndian>(field("bitmap offset", offset as i64)?)?;
        result.write_u8(field("width", glyph.width() as i64)?)?;
        result.write_u8(field("height", glyph.height() as i64)?)?;
        result.write_u8(field("xAdvance", glyph.x_advance as i64)?)?;
        result.write_i8(field("xOffset", glyph.x_offset() as i64)?)?;
        result.write_i8(field("yOffset", glyph.y_offset() as i64)?)?;
        result.write_u8(0)?;
        offset += data.len();
    }
    Ok(result)
}
