use std::collections::HashSet;

use super::super::{FontCodec, FontFormat, LoadOptions, SaveOptions};
use super::to_text;
use crate::{Font, FontError, Glyph, GlyphStatus, Result, SparseMap};

// Hexdraw text fonts:
//
// # comment
// 41:	--##--
// 	-#--#-
// 	######
//
// A code line starts a glyph and may carry its first row. '#' (or '@') sets a pixel, '-' leaves
// it clear. A glyph made of the single row "-" is empty.

pub(crate) struct DrawCodec;

impl FontCodec for DrawCodec {
    fn load(&self, data: &[u8], _options: &LoadOptions) -> Result<Font> {
        Ok(load_draw(to_text(data)?))
    }

    fn save(&self, _font: &Font, _options: &SaveOptions, _fallback_name: Option<&str>) -> Result<Vec<u8>> {
        Err(FontError::FormatNotSupported {
            name: FontFormat::Draw.name().to_string(),
            operation: "saving".to_string(),
        })
    }
}

struct DrawGlyph {
    code: Option<u16>,
    rows: Vec<String>,
}

fn is_row(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| matches!(c, '-' | '#' | '@' | '.'))
}

fn split_code_line(line: &str) -> Option<(&str, &str)> {
    let (code, rest) = line.split_once(':')?;
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some((code, rest.trim()))
}

pub(crate) fn load_draw(text: &str) -> Font {
    let mut parsed: Vec<DrawGlyph> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        if raw.starts_with('#') {
            continue;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((code, first_row)) = split_code_line(line) {
            let code = u16::from_str_radix(code, 16).ok().filter(|c| *c != Glyph::UNASSIGNED);
            if code.is_none() {
                log::warn!("[line:{}] skipping glyph with unusable code '{line}'", i + 1);
            }
            let mut glyph = DrawGlyph { code, rows: Vec::new() };
            if !first_row.is_empty() {
                glyph.rows.push(first_row.to_string());
            }
            parsed.push(glyph);
        } else if is_row(line) {
            match parsed.last_mut() {
                Some(glyph) => glyph.rows.push(line.to_string()),
                None => log::warn!("[line:{}] bitmap row outside of a glyph", i + 1),
            }
        } else {
            log::debug!("[line:{}] ignoring '{line}'", i + 1);
        }
    }

    let y_advance = parsed.iter().map(|g| g.rows.len()).max().unwrap_or_default() as i32;
    let mut codes = HashSet::new();
    let mut glyphs = Vec::new();
    for draw in parsed {
        let Some(code) = draw.code else {
            continue;
        };
        let empty = draw.rows.len() == 1 && draw.rows[0] == "-";
        let width = if empty {
            0
        } else {
            draw.rows.iter().map(|r| r.chars().count()).max().unwrap_or_default() as i32
        };

        let mut map = SparseMap::new();
        if !empty {
            for (y, row) in draw.rows.iter().enumerate() {
                for (x, ch) in row.chars().enumerate() {
                    if matches!(ch, '#' | '@') {
                        map.set(x as i32, y as i32);
                    }
                }
            }
        }
        let mut glyph = Glyph::from_map(&map, 0, -y_advance, width).with_code(code);
        if !codes.insert(code) {
            log::warn!("duplicate glyph code 0x{code:04X}");
            glyph.status = GlyphStatus::Error;
        }
        glyphs.push(glyph);
    }

    let mut font = Font::from_glyphs(glyphs, y_advance);
    font.flatten();
    font
}
