//! End-to-end tests: resolve tokens, paginate, write and reload the PDF.

use image::{ImageFormat, Rgba, RgbaImage};
use lopdf::Document;
use std::path::Path;
use tokensheet::{Error, JsonFormat, PageFormat, RenderOptions, Tokensheet};

fn write_png(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(12, 12, Rgba([30, 90, 30, 200]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn library() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("MM").join("Goblin.png"));
    write_png(&dir.path().join("MM").join("Wight.png"));
    dir
}

#[test]
fn test_write_pdf_single_page() {
    let lib = library();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("tokens.pdf");

    let result = Tokensheet::new()
        .with_library(lib.path())
        .resolve(&["MM/Goblin:6", "Wight"])
        .unwrap();
    result.write_pdf(&output).unwrap();

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    assert_eq!(result.sheet().token_count(), 7);

    // No staging file left behind.
    let leftovers: Vec<_> = std::fs::read_dir(out.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_multi_page_a3_with_names() {
    let lib = library();
    let result = Tokensheet::new()
        .with_library(lib.path())
        .with_format(PageFormat::A3)
        .with_names(true)
        .with_render_options(RenderOptions::new().with_compression(false))
        .resolve(&["MM/Goblin:200"])
        .unwrap();

    let sheet = result.sheet();
    let capacity = sheet.geometry.capacity();
    assert_eq!(sheet.page_count() as usize, 200usize.div_ceil(capacity));

    let bytes = result.to_pdf().unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), sheet.pages.len());

    let (_, first) = pages.into_iter().next().unwrap();
    let content = doc.get_page_content(first).unwrap();
    assert!(String::from_utf8_lossy(&content).contains("(Goblin) Tj"));
}

#[test]
fn test_page_size_matches_format() {
    let lib = library();
    let bytes = Tokensheet::new()
        .with_library(lib.path())
        .with_format(PageFormat::A3)
        .resolve(&["Wight"])
        .unwrap()
        .to_pdf()
        .unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let height = media_box[3].as_float().unwrap();
    assert!((height - PageFormat::A3.height_pt()).abs() < 0.5);
}

#[test]
fn test_unwritable_output_is_write_error() {
    let lib = library();
    let result = Tokensheet::new()
        .with_library(lib.path())
        .resolve(&["Goblin"])
        .unwrap();

    let missing_dir = lib.path().join("no").join("such").join("dir").join("tokens.pdf");
    let err = result.write_pdf(&missing_dir).unwrap_err();
    assert!(matches!(err, Error::Write { .. }));
    assert!(!missing_dir.exists());
}

#[test]
fn test_failed_write_leaves_no_staging_file() {
    let lib = library();
    let result = Tokensheet::new()
        .with_library(lib.path())
        .resolve(&["Goblin"])
        .unwrap();

    let out = tempfile::tempdir().unwrap();
    let occupied = out.path().join("tokens.pdf");
    std::fs::create_dir(&occupied).unwrap();

    let err = result.write_pdf(&occupied).unwrap_err();
    assert!(matches!(err, Error::Write { .. }));

    let entries: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("tokens.pdf")]);
}

#[test]
fn test_unresolvable_token_produces_no_output() {
    let lib = library();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("tokens.pdf");

    let result = Tokensheet::new()
        .with_library(lib.path())
        .resolve(&["MM/Goblin:2", "MM/Mimic"]);
    assert!(matches!(result, Err(Error::UnknownCreature { .. })));
    assert!(!output.exists());
}

#[test]
fn test_layout_json() {
    let lib = library();
    let json = Tokensheet::new()
        .with_library(lib.path())
        .with_names(true)
        .resolve(&["MM/Goblin:2"])
        .unwrap()
        .to_json(JsonFormat::Compact)
        .unwrap();

    assert!(json.contains("\"image\":\"MM/Goblin\""));
    assert!(json.contains("\"name\":\"Goblin\""));
    assert!(json.contains("\"columns\":8"));
}
