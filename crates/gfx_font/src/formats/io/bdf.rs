use std::collections::HashSet;

use super::super::{FontCodec, LoadOptions, SaveOptions};
use super::to_text;
use crate::{Font, FontError, FontProperties, Glyph, GlyphStatus, Result, SparseMap};

// Glyph Bitmap Distribution Format 2.1
// https://adobe-type-tools.github.io/font-tech-notes/pdfs/5005.BDF_Spec.pdf
//
// Only the height of FONTBOUNDINGBOX is used, it becomes the line height (yAdvance).
// BBX offsets count upwards from the baseline, glyph coordinates count downwards.

const SIGNATURE: &str = "STARTFONT 2.1";
const RESOLUTION: i32 = 75;

pub(crate) struct BdfCodec;

impl FontCodec for BdfCodec {
    fn load(&self, data: &[u8], options: &LoadOptions) -> Result<Font> {
        let mut font = load_bdf(to_text(data)?)?;
        if options.flatten {
            font.flatten();
        }
        font.fill_inserted_advance();
        Ok(font)
    }

    fn save(&self, font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> Result<Vec<u8>> {
        Ok(save_bdf(font, options, fallback_name).into_bytes())
    }
}

struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
    current: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
            current: "",
            tokens: Vec::new(),
        }
    }

    fn parse_line(&mut self) -> Result<()> {
        let Some(line) = self.lines.next() else {
            return Err(FontError::UnexpectedEof { line: self.line });
        };
        self.line += 1;
        self.current = line;
        self.tokens = line.split_whitespace().collect();
        Ok(())
    }

    fn keyword(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or_default()
    }

    /// Everything after the keyword, without surrounding quotes.
    fn rest(&self) -> &'a str {
        let rest = self.current.trim_start();
        let rest = rest.strip_prefix(self.keyword()).unwrap_or(rest).trim();
        rest.strip_prefix('"').and_then(|r| r.strip_suffix('"')).unwrap_or(rest)
    }

    /// The `N` integer parameters after the keyword. The last `optional` of them may be missing.
    fn values<const N: usize>(&self, optional: usize) -> Result<[Option<i32>; N]> {
        let mut result = [None; N];
        for (i, value) in result.iter_mut().enumerate() {
            match self.tokens.get(i + 1) {
                Some(tok) => {
                    *value = Some(tok.parse().map_err(|_| {
                        FontError::malformed(self.line, format!("cannot parse integer parameter '{tok}' of {}", self.keyword()))
                    })?);
                }
                None if i >= N - optional => {}
                None => {
                    return Err(FontError::malformed(self.line, format!("not enough parameters for {}", self.keyword())));
                }
            }
        }
        Ok(result)
    }

    fn required<const N: usize>(&self) -> Result<[i32; N]> {
        Ok(self.values::<N>(0)?.map(|v| v.unwrap_or_default()))
    }
}

#[derive(Default)]
struct CharBox {
    width: i32,
    height: i32,
    x: i32,
    y: i32,
}

struct BdfParser<'a> {
    reader: LineReader<'a>,
    global_dwidth: i32,
    glyphs: Vec<Glyph>,
    codes: HashSet<u16>,
}

impl BdfParser<'_> {
    fn parse_char(&mut self) -> Result<()> {
        let mut bbx = CharBox::default();
        let mut dwidth = 0;
        let mut code_point = -1;
        let mut map = SparseMap::new();

        loop {
            self.reader.parse_line()?;
            match self.reader.keyword() {
                "ENCODING" => {
                    let [code, alternative] = self.reader.values::<2>(1)?;
                    code_point = code.unwrap_or(-1);
                    if code_point == -1 {
                        if let Some(alternative) = alternative {
                            code_point = alternative;
                        }
                    }
                }
                "DWIDTH" => {
                    let [x, _] = self.reader.required::<2>()?;
                    dwidth = x;
                }
                "BBX" => {
                    let [width, height, x, y] = self.reader.required::<4>()?;
                    bbx = CharBox { width, height, x, y };
                }
                "BITMAP" => {
                    self.parse_bitmap(&bbx, &mut map)?;
                    break;
                }
                "ENDCHAR" => break,
                _ => {}
            }
        }

        let x_advance = if dwidth == 0 { self.global_dwidth } else { dwidth };
        let mut glyph = Glyph::from_map(&map, bbx.x, -bbx.y - bbx.height, x_advance);
        if (0..Glyph::UNASSIGNED as i32).contains(&code_point) {
            glyph.code = code_point as u16;
            if !self.codes.insert(glyph.code) {
                log::warn!("[line:{}] glyph with duplicate code 0x{:04X}", self.reader.line, glyph.code);
                glyph.status = GlyphStatus::Error;
            }
        } else {
            log::warn!("[line:{}] glyph without usable code ({code_point})", self.reader.line);
            glyph.code = Glyph::UNASSIGNED;
            glyph.status = GlyphStatus::Error;
        }
        self.glyphs.push(glyph);
        Ok(())
    }

    fn parse_bitmap(&mut self, bbx: &CharBox, map: &mut SparseMap) -> Result<()> {
        let mut y = 0;
        loop {
            self.reader.parse_line()?;
            let row = self.reader.keyword();
            if row == "ENDCHAR" {
                break;
            }
            if y < bbx.height {
                let mut x = 0;
                for digit in row.chars() {
                    let Some(nibble) = digit.to_digit(16) else {
                        return Err(FontError::malformed(self.reader.line, format!("invalid bitmap digit '{digit}'")));
                    };
                    if nibble == 0 {
                        x += 4;
                    } else {
                        for bit in (0..4).rev() {
                            if x >= bbx.width {
                                break;
                            }
                            if nibble & (1 << bit) != 0 {
                                map.set(x, y);
                            }
                            x += 1;
                        }
                    }
                    if x >= bbx.width {
                        break;
                    }
                }
            }
            y += 1;
        }
        if y != bbx.height {
            log::warn!("[line:{}] bitmap has {y} rows, BBX declares {}", self.reader.line, bbx.height);
        }
        Ok(())
    }

    fn parse_chars(&mut self) -> Result<()> {
        loop {
            self.reader.parse_line()?;
            match self.reader.keyword() {
                "STARTCHAR" => self.parse_char()?,
                "ENDFONT" => return Ok(()),
                _ => {}
            }
        }
    }
}

pub(crate) fn load_bdf(text: &str) -> Result<Font> {
    let mut parser = BdfParser {
        reader: LineReader::new(text),
        global_dwidth: 0,
        glyphs: Vec::new(),
        codes: HashSet::new(),
    };
    let mut y_advance = 0;
    let mut properties = FontProperties::default();

    parser.reader.parse_line()?;
    if !parser.reader.current.starts_with(SIGNATURE) {
        return Err(FontError::malformed(parser.reader.line, "unsupported file or version, expected 'STARTFONT 2.1'"));
    }

    loop {
        parser.reader.parse_line()?;
        let reader = &parser.reader;
        match reader.keyword() {
            "FONTBOUNDINGBOX" => {
                let [_, height, _, _] = reader.required::<4>()?;
                y_advance = height;
            }
            "DWIDTH" => {
                let [x, _] = reader.required::<2>()?;
                parser.global_dwidth = x;
            }
            "FONT_NAME" => {
                let name = reader.rest();
                if !name.is_empty() {
                    properties.font_name = Some(name.to_string());
                }
            }
            "PIXEL_SIZE" => properties.pixel_size = Some(reader.required::<1>()?[0]),
            "FONT_ASCENT" => properties.ascent = Some(reader.required::<1>()?[0]),
            "FONT_DESCENT" => properties.descent = Some(reader.required::<1>()?[0]),
            "CHARS" => {
                parser.parse_chars()?;
                break;
            }
            "ENDFONT" => break,
            keyword => log::debug!("[line:{}] ignoring '{keyword}'", reader.line),
        }
    }

    let mut font = Font::new(y_advance);
    font.properties = properties;
    font.add_glyphs(parser.glyphs);
    Ok(font)
}

fn hex_row(glyph: &Glyph, y: i32) -> String {
    let bounds = glyph.bounds();
    let mut row = String::new();
    let mut x = bounds.left();
    while x < bounds.right() {
        let mut nibble = 0;
        for bit in (0..4).rev() {
            if x >= bounds.right() {
                break;
            }
            if glyph.get(x, y) {
                nibble |= 1 << bit;
            }
            x += 1;
        }
        row.push_str(&format!("{nibble:X}"));
    }
    if row.len() % 2 != 0 {
        row.push('0');
    }
    row
}

pub(crate) fn save_bdf(font: &Font, options: &SaveOptions, fallback_name: Option<&str>) -> String {
    let mut props = font.filled_properties(fallback_name);
    if let Some(name) = &options.font_name {
        props.font_name = Some(name.clone());
    }
    let name = props.font_name.unwrap_or_default();
    let pixel_size = props.pixel_size.unwrap_or_default();

    let mut result = String::new();
    result.push_str(&format!("{SIGNATURE}\n"));
    result.push_str(&format!("FONT {name}\n"));
    result.push_str(&format!("SIZE {pixel_size} {RESOLUTION} {RESOLUTION}\n"));
    result.push_str(&format!("FONTBOUNDINGBOX {} {} 0 0\n", font.mean_advance(), font.y_advance));
    result.push_str("COMMENT \"Generated by gfx_font\"\n");
    result.push_str("STARTPROPERTIES 4\n");
    result.push_str(&format!("FONT_NAME \"{name}\"\n"));
    result.push_str(&format!("PIXEL_SIZE {pixel_size}\n"));
    result.push_str(&format!("FONT_ASCENT {}\n", props.ascent.unwrap_or_default()));
    result.push_str(&format!("FONT_DESCENT {}\n", props.descent.unwrap_or_default()));
    result.push_str("ENDPROPERTIES\n");
    result.push_str(&format!("CHARS {}\n", font.len()));
    for glyph in font.glyphs() {
        let bounds = glyph.bounds();
        // scalable width in 1/1000 em, taking the pixel size as point size
        let swidth = if pixel_size > 0 {
            (glyph.x_advance as f64 * 1000.0 * 72.0 / (pixel_size as f64 * RESOLUTION as f64)).round() as i32
        } else {
            0
        };
        result.push_str(&format!("STARTCHAR {}\n", glyph.code));
        result.push_str(&format!("ENCODING {}\n", glyph.code));
        result.push_str(&format!("SWIDTH {swidth} 0\n"));
        result.push_str(&format!("DWIDTH {} 0\n", glyph.x_advance));
        result.push_str(&format!(
            "BBX {} {} {} {}\n",
            glyph.width(),
            glyph.height(),
            glyph.x_offset(),
            -glyph.y_offset() - glyph.height()
        ));
        result.push_str("BITMAP\n");
        for y in bounds.y_range() {
            result.push_str(&hex_row(glyph, y));
            result.push('\n');
        }
        result.push_str("ENDCHAR\n");
    }
    result.push_str("ENDFONT\n");
    result
}
