use std::str::FromStr;

use base64::{Engine, engine::general_purpose};
use roxmltree::{Document, Node};

use super::super::{FontCodec, LoadOptions, SaveOptions};
use super::to_text;
use crate::{Font, FontError, FontProperties, Glyph, Result, SparseMap};

// <GfxFont>
//   <yAdvance>8</yAdvance>
//   <FontName>..</FontName> <PixelSize>..</PixelSize> <Ascent>..</Ascent> <Descent>..</Descent>  (optional)
//   <glyphs>
//     <Glyph><Code/><Width/><Height/><xAdvance/><xOffset/><yOffset/><Data>base64</Data></Glyph>
//   </glyphs>
// </GfxFont>

pub(crate) struct XmlCodec;

impl FontCodec for XmlCodec {
    fn load(&self, data: &[u8], _options: &LoadOptions) -> Result<Font> {
        font_from_xml_str(to_text(data)?)
    }

    fn save(&self, font: &Font, options: &SaveOptions, _fallback_name: Option<&str>) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new(true);
        w.open("GfxFont");
        w.element("yAdvance", &font.y_advance.to_string());
        let name = options.font_name.as_ref().or(font.properties.font_name.as_ref());
        if let Some(name) = name {
            w.element("FontName", name);
        }
        if let Some(size) = font.properties.pixel_size {
            w.element("PixelSize", &size.to_string());
        }
        if let Some(ascent) = font.properties.ascent {
            w.element("Ascent", &ascent.to_string());
        }
        if let Some(descent) = font.properties.descent {
            w.element("Descent", &descent.to_string());
        }
        write_glyphs(&mut w, font.glyphs());
        w.close("GfxFont");
        Ok(w.finish().into_bytes())
    }
}

struct XmlWriter {
    out: String,
    pretty: bool,
    depth: usize,
}

impl XmlWriter {
    fn new(pretty: bool) -> Self {
        Self {
            out: String::new(),
            pretty,
            depth: 0,
        }
    }

    fn indent(&mut self) {
        if self.pretty {
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    fn newline(&mut self) {
        if self.pretty {
            self.out.push('\n');
        }
    }

    fn open(&mut self, tag: &str) {
        self.indent();
        self.out.push_str(&format!("<{tag}>"));
        self.newline();
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str(&format!("</{tag}>"));
        self.newline();
    }

    fn element(&mut self, tag: &str, text: &str) {
        self.indent();
        self.out.push_str(&format!("<{tag}>{}</{tag}>", escape(text)));
        self.newline();
    }

    fn finish(self) -> String {
        self.out
    }
}

fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

fn write_glyphs(w: &mut XmlWriter, glyphs: &[Glyph]) {
    w.open("glyphs");
    for glyph in glyphs {
        w.open("Glyph");
        w.element("Code", &glyph.code.to_string());
        w.element("Width", &glyph.width().to_string());
        w.element("Height", &glyph.height().to_string());
        w.element("xAdvance", &glyph.x_advance.to_string());
        w.element("xOffset", &glyph.x_offset().to_string());
        w.element("yOffset", &glyph.y_offset().to_string());
        w.element("Data", &general_purpose::STANDARD.encode(glyph.packed_bytes()));
        w.close("Glyph");
    }
    w.close("glyphs");
}

/// Serializes glyphs as a bare, unformatted `<glyphs>` element (clipboard format).
pub fn glyphs_to_xml_string(glyphs: &[Glyph]) -> String {
    let mut w = XmlWriter::new(false);
    write_glyphs(&mut w, glyphs);
    w.finish()
}

/// Parses a `<glyphs>` element or a single `<Glyph>` element.
pub fn glyphs_from_xml_str(xml: &str) -> Result<Vec<Glyph>> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    match root.tag_name().name() {
        "glyphs" => parse_glyph_list(&doc, root),
        "Glyph" => Ok(vec![parse_glyph(&doc, root)?]),
        "GfxFont" => parse_glyph_list(&doc, child(&doc, root, "glyphs")?),
        other => Err(FontError::malformed(line_of(&doc, root), format!("unexpected element <{other}>"))),
    }
}

pub(crate) fn font_from_xml_str(xml: &str) -> Result<Font> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if !root.has_tag_name("GfxFont") {
        return Err(FontError::malformed(
            line_of(&doc, root),
            format!("expected <GfxFont>, found <{}>", root.tag_name().name()),
        ));
    }
    let y_advance = value(&doc, root, "yAdvance")?;
    let properties = FontProperties {
        font_name: find_child(root, "FontName").map(|n| n.text().unwrap_or_default().to_string()),
        pixel_size: optional_value(&doc, root, "PixelSize")?,
        ascent: optional_value(&doc, root, "Ascent")?,
        descent: optional_value(&doc, root, "Descent")?,
    };
    let glyphs = parse_glyph_list(&doc, child(&doc, root, "glyphs")?)?;

    let mut font = Font::from_glyphs(glyphs, y_advance);
    font.properties = properties;
    Ok(font)
}

fn line_of(doc: &Document, node: Node) -> usize {
    doc.text_pos_at(node.range().start).row as usize
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn child<'a, 'input>(doc: &Document, node: Node<'a, 'input>, tag: &str) -> Result<Node<'a, 'input>> {
    find_child(node, tag).ok_or_else(|| {
        FontError::malformed(
            line_of(doc, node),
            format!("<{}> lacks a <{tag}> element", node.tag_name().name()),
        )
    })
}

fn parse_text<T: FromStr>(doc: &Document, node: Node) -> Result<T> {
    let text = node.text().unwrap_or_default().trim();
    text.parse().map_err(|_| {
        FontError::malformed(
            line_of(doc, node),
            format!("invalid value '{text}' in <{}>", node.tag_name().name()),
        )
    })
}

fn value<T: FromStr>(doc: &Document, node: Node, tag: &str) -> Result<T> {
    parse_text(doc, child(doc, node, tag)?)
}

fn optional_value<T: FromStr>(doc: &Document, node: Node, tag: &str) -> Result<Option<T>> {
    find_child(node, tag).map(|n| parse_text(doc, n)).transpose()
}

fn parse_glyph_list(doc: &Document, node: Node) -> Result<Vec<Glyph>> {
    node.children()
        .filter(|n| n.has_tag_name("Glyph"))
        .map(|n| parse_glyph(doc, n))
        .collect()
}

fn parse_glyph(doc: &Document, node: Node) -> Result<Glyph> {
    let code: u16 = value(doc, node, "Code")?;
    let width: i32 = value(doc, node, "Width")?;
    let height: i32 = value(doc, node, "Height")?;
    if width < 0 || height < 0 {
        return Err(FontError::malformed(line_of(doc, node), format!("negative glyph size {width}x{height}")));
    }
    let x_advance = value(doc, node, "xAdvance")?;
    let x_offset = value(doc, node, "xOffset")?;
    let y_offset = value(doc, node, "yOffset")?;
    let data: String = child(doc, node, "Data")?
        .text()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let data = general_purpose::STANDARD.decode(data)?;
    let required = SparseMap::required_bytes(width, height);
    if data.len() < required {
        return Err(FontError::malformed(
            line_of(doc, node),
            format!("glyph {width}x{height} needs {required} bitmap bytes, found {}", data.len()),
        ));
    }
    Ok(Glyph::from_packed(&data, width, height, x_offset, y_offset, x_advance).with_code(code))
}
