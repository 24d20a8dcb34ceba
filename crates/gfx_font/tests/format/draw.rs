use gfx_font::{FontError, FontFormat, GlyphStatus, LoadOptions, SaveOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_load() {
    let text = "# hexdraw\n0041:\t-#-\n\t#-#\n\t###\n\n0043:\t-\n0041:\t#\nzz:\t#\n";
    let font = FontFormat::Draw.from_bytes(text.as_bytes(), &LoadOptions::default()).unwrap();
    assert!(font.is_flat());
    assert_eq!(font.y_advance, 3);
    let glyphs: Vec<_> = font.glyphs().iter().map(|g| (g.code, g.status, g.points().count())).collect();
    assert_eq!(
        glyphs,
        vec![
            (0x40, GlyphStatus::Error, 1),
            (0x41, GlyphStatus::Normal, 6),
            (0x42, GlyphStatus::Inserted, 0),
            (0x43, GlyphStatus::Normal, 0),
        ]
    );
}

#[test]
fn test_save_not_supported() {
    let err = FontFormat::Draw.to_bytes(&crate::tiny_font(), &SaveOptions::default(), None).unwrap_err();
    assert!(matches!(err, FontError::FormatNotSupported { .. }), "{err}");
}
