use gfx_font::{FontFormat, LoadOptions, SaveOptions};

use crate::{glyph, init_logging};

#[test]
fn test_round_trip() {
    init_logging();
    let font = gfx_font::Font::from_glyphs(
        [
            glyph(0x41, 4, &[(1, -3), (0, -2), (2, -2), (0, -1), (1, -1), (2, -1)]),
            glyph(0x42, 3, &[(0, -3), (0, 0)]),
        ],
        4,
    );
    let options = SaveOptions {
        font_name: Some("Tiny".to_string()),
    };
    let data = FontFormat::Yaff.to_bytes(&font, &options, None).unwrap();
    let back = FontFormat::Yaff.from_bytes(&data, &LoadOptions::default()).unwrap();

    assert_eq!(back.properties.font_name.as_deref(), Some("Tiny"));
    assert!(back.is_flat());
    let codes: Vec<u16> = back.glyphs().iter().map(|g| g.code).collect();
    assert_eq!(codes, vec![0x41, 0x42]);
    for (a, b) in back.glyphs().iter().zip(font.glyphs()) {
        assert_eq!(a.points().count(), b.points().count(), "0x{:02X}", b.code);
    }
}

#[test]
fn test_invalid_utf8() {
    let result = FontFormat::Yaff.from_bytes(&[0xFF, 0xFE, 0x00, 0x80, 0x80], &LoadOptions::default());
    assert!(result.is_err());
}
