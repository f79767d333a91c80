mod common;

use common::*;
use pdf_compose::{
    BuilderKind, ComposeError, Document, DocumentBuilder, Orientation, SignatureOptions,
    StandardBuilder, TextStyle,
};
use tempfile::TempDir;

#[test]
fn drawing_without_a_page_fails() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 1, 600.0);

    let mut builder = StandardBuilder::new();
    builder.select_source(&a).unwrap();
    builder.set_text_style(&TextStyle::default());
    let result = builder.write_text("orphan");
    assert!(matches!(result, Err(ComposeError::NoCurrentPage)));
}

#[test]
fn importing_without_a_source_fails() {
    let mut builder = StandardBuilder::new();
    let result = builder.import_page(1);
    assert!(matches!(result, Err(ComposeError::InvalidArgument(_))));
}

#[test]
fn importing_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 3, 600.0);

    let mut builder = StandardBuilder::new();
    builder.select_source(&a).unwrap();
    assert!(matches!(
        builder.import_page(0),
        Err(ComposeError::PageRange { page: 0, count: 3 })
    ));
    assert!(matches!(
        builder.import_page(4),
        Err(ComposeError::PageRange { page: 4, count: 3 })
    ));
    assert!(builder.import_page(3).is_ok());
}

#[test]
fn templates_carry_geometry_and_orientation() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 2, 900.0);

    let mut builder = StandardBuilder::new();
    builder.select_source(&a).unwrap();
    let template = builder.import_page(1).unwrap();
    assert_eq!(template.width, 900.0);
    assert_eq!(template.height, 792.0);
    assert_eq!(template.orientation, Orientation::Landscape);
}

#[test]
fn select_source_is_idempotent_and_switchable() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 3, 600.0);
    let b = save_fixture(&dir, "b.pdf", 2, 400.0);

    let mut builder = StandardBuilder::new();
    builder.select_source(&a).unwrap();
    builder.select_source(&a).unwrap();
    assert_eq!(builder.source_page_count().unwrap(), 3);

    builder.select_source(&b).unwrap();
    assert_eq!(builder.source_page_count().unwrap(), 2);

    builder.select_source(&a).unwrap();
    assert_eq!(builder.source_page_count().unwrap(), 3);
}

#[test]
fn standard_builder_rejects_vector_and_signature_work() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 1, 600.0);

    let mut builder = BuilderKind::Standard.create();
    builder.select_source(&a).unwrap();
    assert!(matches!(
        builder.place_vector_image(a.as_path(), &Default::default()),
        Err(ComposeError::Unsupported(_))
    ));
    let options = SignatureOptions::new("cert.pem", "key.pem");
    assert!(matches!(
        builder.apply_signature(&options),
        Err(ComposeError::Unsupported(_))
    ));
}

#[test]
fn signing_with_bad_credentials_fails_after_envelope_preparation() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 2, 600.0);
    let cert = dir.path().join("cert.der");
    let key = dir.path().join("key.der");
    std::fs::write(&cert, b"not a certificate").unwrap();
    std::fs::write(&key, b"not a key").unwrap();
    let out = dir.path().join("signed.pdf");

    let options = SignatureOptions::new(&cert, &key).with_info("Reason", "testing");
    let result = Document::open(&a).unwrap().sign(&options, &out);

    // The envelope is prepared and serialized; credential parsing fails
    assert!(matches!(result, Err(ComposeError::Signature(_))));
    assert!(!out.exists());
}

#[test]
fn signing_with_missing_credentials_fails_with_io() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 1, 600.0);
    let out = dir.path().join("signed.pdf");

    let options = SignatureOptions::new(
        dir.path().join("no-cert.pem"),
        dir.path().join("no-key.pem"),
    );
    let result = Document::open(&a).unwrap().sign(&options, &out);
    assert!(matches!(result, Err(ComposeError::Io(_))));
}

#[test]
fn page_count_requires_a_parsable_pdf() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.pdf");
    std::fs::write(&bogus, b"this is not a pdf").unwrap();

    let doc = Document::open(&bogus).unwrap();
    assert!(matches!(doc.page_count(), Err(ComposeError::Pdf(_))));
}

#[test]
fn cursor_moves_subsequent_text() {
    let dir = TempDir::new().unwrap();
    let a = save_fixture(&dir, "a.pdf", 1, 600.0);
    let out = dir.path().join("cursor.pdf");

    let mut builder = BuilderKind::Standard.create();
    builder.select_source(&a).unwrap();
    let template = builder.import_page(1).unwrap();
    builder.new_page(template.orientation, template.width, template.height);
    builder.stamp(&template).unwrap();
    builder.set_text_style(&TextStyle::default().with_size(10.0));
    builder.set_cursor(100.0, 50.0);
    builder.write_text("here").unwrap();
    builder.write_to(&out).unwrap();

    let content = page_content(&out, 1);
    // y = 792 - 50 - 10
    assert!(content.contains("100 732 Td (here) Tj"));
}
