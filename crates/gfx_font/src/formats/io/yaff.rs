use std::collections::HashSet;

use libyaff::{Bitmap, GlyphDefinition, Label, YaffFont, to_yaff_string};

use super::super::{FontCodec, LoadOptions, SaveOptions};
use crate::{Font, FontProperties, Glyph, GlyphStatus, Result, SparseMap};

pub(crate) struct YaffCodec;

impl FontCodec for YaffCodec {
    fn load(&self, data: &[u8], _options: &LoadOptions) -> Result<Font> {
        let yaff = YaffFont::from_bytes(data)?;
        Ok(from_yaff(&yaff))
    }

    fn save(&self, font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> Result<Vec<u8>> {
        let mut yaff = to_yaff(font);
        if let Some(name) = &options.font_name {
            yaff.name = Some(name.clone());
        } else if yaff.name.is_none() {
            yaff.name = Some(font.font_name_or_default(fallback_name));
        }
        Ok(to_yaff_string(&yaff).into_bytes())
    }
}

fn label_code(labels: &[Label]) -> Option<u32> {
    let codepoint = labels.iter().find_map(|label| match label {
        Label::Codepoint(codes) => codes.first().map(|&c| c as u32),
        _ => None,
    });
    codepoint.or_else(|| {
        labels.iter().find_map(|label| match label {
            Label::Unicode(codes) => codes.first().map(|&c| c as u32),
            _ => None,
        })
    })
}

pub(crate) fn from_yaff(yaff: &YaffFont) -> Font {
    let tallest = yaff.glyphs.iter().map(|g| g.bitmap.pixels.len()).max().unwrap_or_default() as i32;
    let y_advance = yaff.line_height.or(yaff.pixel_size).unwrap_or(tallest);
    let top = yaff.ascent.unwrap_or(y_advance);

    let mut codes = HashSet::new();
    let mut glyphs = Vec::with_capacity(yaff.glyphs.len());
    for def in &yaff.glyphs {
        let left = def.left_bearing.unwrap_or_default();
        let right = def.right_bearing.unwrap_or_default();
        let width = def.bitmap.pixels.iter().map(Vec::len).max().unwrap_or_default() as i32;

        let mut map = SparseMap::new();
        for (r, row) in def.bitmap.pixels.iter().enumerate() {
            for (c, &pixel) in row.iter().enumerate() {
                if pixel {
                    map.set(c as i32 + left, r as i32 - top);
                }
            }
        }

        let mut glyph = Glyph::from_map(&map, 0, 0, (width + left + right).max(0));
        match label_code(&def.labels) {
            Some(code) if code < Glyph::UNASSIGNED as u32 => {
                glyph.code = code as u16;
                if !codes.insert(glyph.code) {
                    log::warn!("duplicate glyph code 0x{code:04X}");
                    glyph.status = GlyphStatus::Error;
                }
            }
            _ => {
                log::debug!("glyph without usable code label {:?}", def.labels.first());
                glyph.status = GlyphStatus::Error;
            }
        }
        glyphs.push(glyph);
    }

    let mut font = Font::from_glyphs(glyphs, y_advance);
    font.properties = FontProperties {
        font_name: yaff.name.clone(),
        pixel_size: yaff.pixel_size,
        ascent: yaff.ascent,
        descent: yaff.descent,
    };
    font.flatten();
    font
}

/// Rasterizes every glyph over the font's full vertical extent.
pub(crate) fn to_yaff(font: &Font) -> YaffFont {
    let full = font.full_bounds();
    let glyphs = font
        .glyphs()
        .iter()
        .map(|glyph| {
            let bounds = glyph.bounds();
            let (pixels, left, right) = if glyph.is_blank() {
                (Vec::new(), 0, glyph.x_advance)
            } else {
                let pixels: Vec<Vec<bool>> = full
                    .y_range()
                    .map(|y| bounds.x_range().map(|x| glyph.get(x, y)).collect())
                    .collect();
                (pixels, bounds.left(), glyph.x_advance - bounds.right())
            };
            let height = pixels.len();
            GlyphDefinition {
                labels: vec![Label::Codepoint(vec![glyph.code])],
                bitmap: Bitmap {
                    pixels,
                    width: bounds.width() as usize,
                    height,
                },
                left_bearing: Some(left),
                right_bearing: Some(right),
                ..Default::default()
            }
        })
        .collect();

    YaffFont {
        name: font.properties.font_name.clone(),
        pixel_size: Some(font.pixel_size_or_default()),
        line_height: Some(font.y_advance),
        ascent: Some(-full.top()),
        descent: Some(font.descent_or_default()),
        glyphs,
        ..Default::default()
    }
}
