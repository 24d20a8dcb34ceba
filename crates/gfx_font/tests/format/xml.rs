use gfx_font::{Font, FontError, FontFormat, GlyphStatus, LoadOptions, SaveOptions, glyphs_from_xml_str, glyphs_to_xml_string};
use pretty_assertions::assert_eq;

use crate::{glyph, tiny_font};

#[test]
fn test_document_layout() {
    let mut font = Font::from_glyphs([glyph(0x41, 3, &[(0, -2), (1, -2), (0, -1)])], 4);
    font.properties.font_name = Some("A&B".to_string());
    font.properties.ascent = Some(3);
    let data = FontFormat::Xml.to_bytes(&font, &SaveOptions::default(), None).unwrap();
    let expected = concat!(
        "<GfxFont>\n",
        "  <yAdvance>4</yAdvance>\n",
        "  <FontName>A&amp;B</FontName>\n",
        "  <Ascent>3</Ascent>\n",
        "  <glyphs>\n",
        "    <Glyph>\n",
        "      <Code>65</Code>\n",
        "      <Width>2</Width>\n",
        "      <Height>2</Height>\n",
        "      <xAdvance>3</xAdvance>\n",
        "      <xOffset>0</xOffset>\n",
        "      <yOffset>-2</yOffset>\n",
        "      <Data>4A==</Data>\n",
        "    </Glyph>\n",
        "  </glyphs>\n",
        "</GfxFont>\n",
    );
    assert_eq!(String::from_utf8(data.clone()).unwrap(), expected);
    assert_eq!(FontFormat::Xml.from_bytes(&data, &LoadOptions::default()).unwrap(), font);
}

#[test]
fn test_unflattened_round_trip() {
    let font = Font::from_glyphs(
        [
            glyph(0x30, 5, &[(1, -3), (2, -1)]),
            glyph(0x30, 6, &[(0, 0)]),
            glyph(0x40, 7, &[]),
            glyph(0xFFFF, 8, &[(4, -4)]),
        ],
        10,
    );
    assert!(!font.is_flat());
    let data = FontFormat::Xml.to_bytes(&font, &SaveOptions::default(), None).unwrap();
    let back = FontFormat::Xml.from_bytes(&data, &LoadOptions::default()).unwrap();
    assert_eq!(back, font);
}

#[test]
fn test_clipboard() {
    let font = tiny_font();
    let xml = glyphs_to_xml_string(font.glyphs());
    assert!(xml.starts_with("<glyphs><Glyph><Code>65</Code>"), "{xml}");
    assert!(!xml.contains('\n'));
    let glyphs = glyphs_from_xml_str(&xml).unwrap();
    assert_eq!(glyphs, font.glyphs());
    assert!(glyphs.iter().all(|g| g.status == GlyphStatus::Normal));
}

#[test]
fn test_errors() {
    let err = FontFormat::Xml.from_bytes(b"<GfxFont><glyphs/></GfxFont>", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::Malformed { line: 1, .. }), "{err}");

    let err = FontFormat::Xml.from_bytes(b"<GfxFont><yAdvance>x</yAdvance><glyphs/></GfxFont>", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::Malformed { .. }), "{err}");

    let err = glyphs_from_xml_str("<Glyph><Code>1</Code><Width>1</Width><Height>1</Height><xAdvance>1</xAdvance><xOffset>0</xOffset><yOffset>0</yOffset><Data>!!</Data></Glyph>").unwrap_err();
    assert!(matches!(err, FontError::Base64(_)), "{err}");
}

#[test]
fn test_glyph_size_without_data() {
    let xml = b"<GfxFont><yAdvance>8</yAdvance>\n<glyphs>\n<Glyph><Code>65</Code><Width>200000</Width><Height>200000</Height><xAdvance>3</xAdvance><xOffset>0</xOffset><yOffset>0</yOffset><Data></Data></Glyph></glyphs></GfxFont>";
    let err = FontFormat::Xml.from_bytes(xml, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::Malformed { line: 3, .. }), "{err}");
}
