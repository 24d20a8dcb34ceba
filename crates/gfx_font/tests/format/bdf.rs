use gfx_font::{FontError, FontFormat, GlyphStatus, LoadOptions, Position, SaveOptions};
use pretty_assertions::assert_eq;

use crate::{glyph, init_logging, tiny_font};

const DIAGONAL: &str = "STARTFONT 2.1
FONT -misc-test-medium-r-normal--8-80-75-75-c-60-iso10646-1
SIZE 8 75 75
FONTBOUNDINGBOX 5 8 0 -1
STARTPROPERTIES 3
FONT_NAME \"Test Font\"
FONT_ASCENT 7
FONT_DESCENT 1
ENDPROPERTIES
CHARS 1
STARTCHAR A
ENCODING 65
SWIDTH 500 0
DWIDTH 6 0
BBX 5 7 0 -1
BITMAP
10
20
40
80
00
00
00
ENDCHAR
ENDFONT
";

fn load(text: &str, options: &LoadOptions) -> gfx_font::Result<gfx_font::Font> {
    FontFormat::Bdf.from_bytes(text.as_bytes(), options)
}

#[test]
fn test_diagonal() {
    init_logging();
    let font = load(DIAGONAL, &LoadOptions::default()).unwrap();
    assert_eq!(font.y_advance, 8);
    assert_eq!(font.properties.font_name.as_deref(), Some("Test Font"));
    assert_eq!(font.properties.ascent, Some(7));
    assert_eq!(font.properties.descent, Some(1));
    assert_eq!(font.properties.pixel_size, None);

    let glyph = font.glyph(65).unwrap();
    assert_eq!(glyph.x_advance, 6);
    let points: Vec<Position> = glyph.points().collect();
    assert_eq!(
        points,
        vec![Position::new(3, -6), Position::new(2, -5), Position::new(1, -4), Position::new(0, -3)]
    );
}

#[test]
fn test_codes_and_global_width() {
    init_logging();
    let text = "STARTFONT 2.1
FONTBOUNDINGBOX 4 6 0 -1
DWIDTH 5 0
CHARS 4
STARTCHAR one
ENCODING 66
BBX 1 1 0 0
BITMAP
80
ENDCHAR
STARTCHAR two
ENCODING 66
DWIDTH 3 0
ENDCHAR
STARTCHAR nonstandard
ENCODING -1 68
ENDCHAR
STARTCHAR none
ENCODING -1
ENDCHAR
ENDFONT
";
    let font = load(text, &LoadOptions::default()).unwrap();
    let glyphs: Vec<_> = font.glyphs().iter().map(|g| (g.code, g.x_advance, g.status)).collect();
    assert_eq!(
        glyphs,
        vec![
            (66, 5, GlyphStatus::Normal),
            (66, 3, GlyphStatus::Error),
            (68, 5, GlyphStatus::Normal),
            (0xFFFF, 5, GlyphStatus::Error),
        ]
    );
    assert!(font.glyphs()[0].get(0, -1));

    let flat = load(
        text,
        &LoadOptions {
            flatten: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(flat.is_flat());
    assert_eq!(flat.len(), 5);
}

#[test]
fn test_inserted_glyphs_get_mean_advance() {
    let text = "STARTFONT 2.1\nCHARS 2\nSTARTCHAR a\nENCODING 65\nDWIDTH 6 0\nENDCHAR\nSTARTCHAR c\nENCODING 67\nDWIDTH 8 0\nENDCHAR\nENDFONT\n";
    let font = load(
        text,
        &LoadOptions {
            flatten: true,
            ..Default::default()
        },
    )
    .unwrap();
    let inserted = font.glyph(66).unwrap();
    assert_eq!(inserted.status, GlyphStatus::Inserted);
    assert_eq!(inserted.x_advance, 7);
}

#[test]
fn test_errors() {
    init_logging();
    let err = load("STARTFONT 3.0\nENDFONT\n", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::Malformed { line: 1, .. }), "{err}");

    let err = load("STARTFONT 2.1\nCHARS 1\nSTARTCHAR A\n", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::UnexpectedEof { line: 3 }), "{err}");

    let err = load("STARTFONT 2.1\nCHARS 1\nSTARTCHAR A\nBBX 8 1 0 0\nBITMAP\nG0\nENDCHAR\nENDFONT\n", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::Malformed { line: 6, .. }), "{err}");

    let err = load("STARTFONT 2.1\nFONTBOUNDINGBOX 8 8\n", &LoadOptions::default()).unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_save() {
    let mut font = tiny_font();
    font.properties.pixel_size = Some(4);
    let data = FontFormat::Bdf.to_bytes(&font, &SaveOptions::default(), Some("tiny")).unwrap();
    let text = String::from_utf8(data).unwrap();
    let expected_glyph = "STARTCHAR 65\nENCODING 65\nSWIDTH 720 0\nDWIDTH 3 0\nBBX 2 2 0 0\nBITMAP\nC0\n80\nENDCHAR\n";
    assert!(text.starts_with("STARTFONT 2.1\nFONT tiny\nSIZE 4 75 75\nFONTBOUNDINGBOX 3 4 0 0\n"), "{text}");
    assert!(text.contains("STARTPROPERTIES 4\nFONT_NAME \"tiny\"\nPIXEL_SIZE 4\n"), "{text}");
    assert!(text.contains("CHARS 2\n"), "{text}");
    assert!(text.contains(expected_glyph), "{text}");
    assert!(text.ends_with("BBX 0 0 0 0\nBITMAP\nENDCHAR\nENDFONT\n"), "{text}");

    let back = load(&text, &LoadOptions::default()).unwrap();
    assert_eq!(back.glyphs(), font.glyphs());
    assert_eq!(back.y_advance, font.y_advance);
    assert_eq!(back.properties.font_name.as_deref(), Some("tiny"));
}

#[test]
fn test_save_descender_offsets() {
    let font = gfx_font::Font::from_glyphs([glyph(0x67, 4, &[(0, -2), (1, 1), (9, 0)])], 6);
    let data = FontFormat::Bdf.to_bytes(&font, &SaveOptions::default(), None).unwrap();
    let text = String::from_utf8(data).unwrap();
    assert!(text.contains("BBX 10 4 0 -2\nBITMAP\n8000\n0000\n0040\n4000\n"), "{text}");
    let back = load(&text, &LoadOptions::default()).unwrap();
    assert_eq!(back.glyphs(), font.glyphs());
}
