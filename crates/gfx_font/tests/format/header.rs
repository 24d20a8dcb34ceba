use gfx_font::{FontError, FontFormat, LoadOptions, Rectangle, SaveOptions};
use pretty_assertions::assert_eq;

use crate::{init_logging, tiny_font};

const FONTCONVERT_OUTPUT: &str = r#"#pragma once
#include <Adafruit_GFX.h>

/* PROPERTIES

FONT_NAME Tiny Sans
PIXEL_SIZE 4
*/
const uint8_t TinySans4pt7bBitmaps[] PROGMEM = {
  0xE0, // '!'
  0xA0 };

const GFXglyph TinySans4pt7bGlyphs[] PROGMEM = {
  {     0,   1,   3,   2,    0,   -3 },   // 0x21 '!'
  {     1,   3,   1,   4,    0,   -3 } }; // 0x22 '"'

/* font data
   { first, last, yAdvance } */
const GFXfont TinySans4pt7b PROGMEM = {
  (uint8_t  *)TinySans4pt7bBitmaps,
  (GFXglyph *)TinySans4pt7bGlyphs,
  0x21, 0x22, 5 };

// Approx. 30 bytes
"#;

fn load(text: &str) -> gfx_font::Result<gfx_font::Font> {
    FontFormat::AdafruitHeader.from_bytes(text.as_bytes(), &LoadOptions::default())
}

#[test]
fn test_single_glyph() {
    init_logging();
    let text = "const uint8_t B[] PROGMEM = { 0xFF };\nconst GFXglyph G[] PROGMEM = { { 0, 1, 8, 8, 0, -8 } };\nconst GFXfont F PROGMEM = { (uint8_t *)B, (GFXglyph *)G, 0x20, 0x20, 8 };\n";
    let font = load(text).unwrap();
    assert_eq!(font.len(), 1);
    assert_eq!(font.y_advance, 8);
    let glyph = &font.glyphs()[0];
    assert_eq!(glyph.code, 0x20);
    assert_eq!(glyph.x_advance, 8);
    assert_eq!(glyph.points().count(), 8);
    assert_eq!(glyph.bounds(), Rectangle::from(0, -8, 1, 8));
}

#[test]
fn test_fontconvert_output() {
    init_logging();
    let font = load(FONTCONVERT_OUTPUT).unwrap();
    assert_eq!(font.properties.font_name.as_deref(), Some("Tiny Sans"));
    assert_eq!(font.properties.pixel_size, Some(4));
    assert_eq!(font.start_code(), 0x21);
    assert_eq!(font.end_code(), 0x22);
    assert_eq!(font.y_advance, 5);

    let excl = font.glyph(0x21).unwrap();
    assert_eq!(excl.bounds(), Rectangle::from(0, -3, 1, 3));
    let quote = font.glyph(0x22).unwrap();
    assert!(quote.get(0, -3));
    assert!(!quote.get(1, -3));
    assert!(quote.get(2, -3));
    assert_eq!(quote.x_advance, 4);
}

#[test]
fn test_syntax_errors_carry_lines() {
    init_logging();
    let err = load("const uint8_t B[] = { 0xFF };\nconst GFXglyph G[] = {\n  { 0, 1, 8, 8, 0, x } };").unwrap_err();
    assert!(matches!(err, FontError::ExpectedNumber { line: 3, .. }), "{err}");
    assert_eq!(err.line(), Some(3));

    let err = load("const uint8_t B[] = { 0xFF };").unwrap_err();
    assert!(matches!(err, FontError::UnexpectedEof { .. }), "{err}");

    let err = load("const char B[] = { 0xFF };").unwrap_err();
    assert_eq!(err.to_string(), "[line:1] Expected 'uint8_t', found 'char'");
}

#[test]
fn test_save_layout() {
    let options = SaveOptions {
        font_name: Some("Tiny".to_string()),
    };
    let data = FontFormat::AdafruitHeader.to_bytes(&tiny_font(), &options, None).unwrap();
    let expected = concat!(
        "#pragma once\n",
        "#include <Adafruit_GFX.h>\n",
        "const uint8_t TinyBitmaps[] PROGMEM = {\n",
        "/* 'A' 0x41 */ 0xE0, \n",
        "/* 'B' 0x42 */ \n",
        "};\n",
        "\n",
        "const GFXglyph TinyGlyphs[] PROGMEM = {\n",
        "/* 'A' 0x41 */ {     0,    2,   2,   3,   0,   -2 },\n",
        "/* 'B' 0x42 */ {     1,    0,   0,   2,   0,    0 },\n",
        "};\n",
        "\n",
        "const GFXfont Tiny PROGMEM = {\n",
        "(uint8_t*)TinyBitmaps,\n",
        "(GFXglyph*)TinyGlyphs,\n",
        "0x41, 0x42, 4 \n",
        "};\n",
    );
    assert_eq!(String::from_utf8(data).unwrap(), expected);
    assert_eq!(load(expected).unwrap(), tiny_font());
}

#[test]
fn test_save_properties_and_identifier() {
    let mut font = tiny_font();
    font.properties.font_name = Some("Tiny Sans 4".to_string());
    font.properties.descent = Some(1);
    let data = FontFormat::AdafruitHeader.to_bytes(&font, &SaveOptions::default(), Some("ignored")).unwrap();
    let text = String::from_utf8(data).unwrap();
    assert!(text.contains("/* PROPERTIES\n\nFONT_NAME Tiny Sans 4\nFONT_DESCENT 1\n*/\n"), "{text}");
    assert!(text.contains("const GFXfont Tiny_Sans_4 PROGMEM = {"), "{text}");

    let back = load(&text).unwrap();
    assert_eq!(back, font);
}

#[test]
fn test_save_requires_flat_font() {
    let mut font = tiny_font();
    font.add(crate::glyph(0x45, 2, &[]));
    let err = FontFormat::AdafruitHeader.to_bytes(&font, &SaveOptions::default(), None).unwrap_err();
    assert!(matches!(err, FontError::NotFlat { .. }), "{err}");

    font.flatten();
    assert!(FontFormat::AdafruitHeader.to_bytes(&font, &SaveOptions::default(), None).is_ok());
}
