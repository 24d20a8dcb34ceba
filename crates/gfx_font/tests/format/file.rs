use std::path::Path;

use gfx_font::{FontError, FontFormat, LoadOptions, SaveOptions, load_file, save_file};
use pretty_assertions::assert_eq;

use crate::{init_logging, temp_path, tiny_font};

#[test]
fn test_save_and_load_by_extension() {
    init_logging();
    // yaff round trips are covered in yaff.rs
    let formats = [FontFormat::AdafruitHeader, FontFormat::Bdf, FontFormat::Binary, FontFormat::Xml];
    for format in formats {
        let path = temp_path(&format!("tiny.{}", format.extension()));
        let mut font = tiny_font();
        save_file(&mut font, &path, &SaveOptions::default()).unwrap();
        assert_eq!(font.path.as_deref(), Some(path.as_path()));

        let loaded = load_file(&path, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.len(), 2, "{format}");
        assert_eq!(loaded.glyph(0x41).map(|g| g.points().count()), Some(3), "{format}");
        std::fs::remove_file(&path).unwrap();
    }
}

#[test]
fn test_header_identifier_from_file_name() {
    let path = temp_path("my-font 9pt.h");
    let mut font = tiny_font();
    save_file(&mut font, &path, &SaveOptions::default()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    let stem = path.file_stem().unwrap().to_string_lossy().to_string();
    let identifier = gfx_font::sanitize_identifier(&stem);
    assert!(text.contains(&format!("const GFXfont {identifier} PROGMEM")), "{text}");
}

#[test]
fn test_errors_name_the_file() {
    init_logging();
    let err = load_file(Path::new("font.ttf"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FontError::UnsupportedFormat { .. }), "{err}");

    let missing = temp_path("does_not_exist.bdf");
    let err = load_file(&missing, &LoadOptions::default()).unwrap_err();
    match &err {
        FontError::InFile { path, source } => {
            assert_eq!(path, &missing);
            assert!(matches!(**source, FontError::Io(_)));
        }
        other => panic!("unexpected error {other}"),
    }

    let path = temp_path("broken.h");
    std::fs::write(&path, "const uint8_t B[] = { 0xFF };\nconst GFXglyph G[] = { 1 };\n").unwrap();
    let err = load_file(&path, &LoadOptions::default()).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(err.line(), Some(2));
    assert!(err.to_string().starts_with(&format!("[{}] [line:2]", path.display())), "{err}");
}

#[test]
fn test_empty_font_is_not_saved() {
    let path = temp_path("empty.gfxfntx");
    let mut font = gfx_font::Font::new(8);
    let err = save_file(&mut font, &path, &SaveOptions::default()).unwrap_err();
    assert!(err.to_string().contains("without glyphs"), "{err}");
    assert!(!path.exists());
}
