use std::path::PathBuf;

use gfx_font::{Font, Glyph, GlyphStatus};

mod format;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A file name under the system temp dir, unique per test.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gfx_font_{}_{name}", std::process::id()))
}

pub fn glyph(code: u16, x_advance: i32, points: &[(i32, i32)]) -> Glyph {
    let mut glyph = Glyph::blank(code, x_advance, GlyphStatus::Normal);
    for (x, y) in points {
        glyph.set(*x, *y);
    }
    glyph
}

/// 'A' with three pixels and an empty 'B'.
pub fn tiny_font() -> Font {
    Font::from_glyphs([glyph(0x41, 3, &[(0, -2), (1, -2), (0, -1)]), glyph(0x42, 2, &[])], 4)
}

#[test]
fn test_flatten_is_idempotent() {
    let inputs: [&[u16]; 4] = [&[0x41, 0x41, 0x45], &[0xFFFF, 3, 3, 3], &[10, 500, 501, 0xFFFF], &[0x20]];
    for codes in inputs {
        let mut font = Font::from_glyphs(codes.iter().map(|c| glyph(*c, 5, &[(0, -1)])), 8);
        font.flatten();
        assert!(font.is_flat(), "{codes:?}");
        let once = font.clone();
        font.flatten();
        assert_eq!(font, once);
    }
}

#[test]
fn test_flatten_scenario() {
    let mut font = Font::from_glyphs([glyph(5, 1, &[]), glyph(5, 2, &[]), glyph(8, 3, &[])], 8);
    assert!(!font.is_flat());
    font.flatten();
    let result: Vec<_> = font.glyphs().iter().map(|g| (g.code, g.status)).collect();
    pretty_assertions::assert_eq!(
        result,
        vec![
            (4, GlyphStatus::Error),
            (5, GlyphStatus::Normal),
            (6, GlyphStatus::Inserted),
            (7, GlyphStatus::Inserted),
            (8, GlyphStatus::Normal),
        ]
    );
}

#[test]
fn test_font_serde() {
    let mut font = tiny_font();
    font.properties.font_name = Some("Tiny".to_string());
    let json = serde_json::to_string(&font).unwrap();
    let back: Font = serde_json::from_str(&json).unwrap();
    pretty_assertions::assert_eq!(back, font);
}
