mod common;

use flowdoc_pdf::{Document, FontRegistry, LayoutConfig};

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

#[test]
fn writes_a_pdf_with_one_page_object_per_page() {
    common::init_logging();
    let fonts = FontRegistry::new();
    let mut doc = Document::open(LayoutConfig::default().with_title("Hilfe"), &fonts);
    doc.use_standard_furniture();
    for i in 0..4 {
        doc.add_page();
        doc.add_paragraph(&format!("Seite {i}")).unwrap();
    }
    let bytes = doc.close_document().unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, "/Count 4"));
    assert_eq!(count(&bytes, "/MediaBox"), 4);
    assert!(contains(&bytes, "/FlateDecode"));
    assert!(contains(&bytes, "/BaseFont /Helvetica"));
    assert!(contains(&bytes, "/Title"));
    assert!(contains(&bytes, "/Producer"));
    assert!(contains(&bytes, "%%EOF"));
}

#[test]
fn untitled_document_has_no_title_entry() {
    let fonts = FontRegistry::new();
    let bytes = Document::open(LayoutConfig::default(), &fonts)
        .close_document()
        .unwrap();
    assert!(!contains(&bytes, "/Title"));
    assert!(contains(&bytes, "/Producer"));
}

#[test]
fn empty_document_is_a_single_blank_page() {
    let fonts = FontRegistry::new();
    let bytes = Document::open(LayoutConfig::default(), &fonts)
        .close_document()
        .unwrap();
    assert!(contains(&bytes, "/Count 1"));
}

#[test]
fn invalid_truetype_data_is_rejected() {
    let mut fonts = FontRegistry::new();
    let err = fonts
        .register_ttf("Broken", false, false, b"not a font".to_vec())
        .unwrap_err();
    assert!(matches!(err, flowdoc_pdf::Error::Font(_)));
}
