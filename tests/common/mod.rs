//! Shared fixtures: programmatically built PDFs whose page geometry
//! encodes the page order, so composed outputs can be checked structurally.
#![allow(dead_code)]

use lopdf::{Dictionary, Document as LoDocument, Object, Stream};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a PDF with `num_pages` pages. Page `i` (1-based) has MediaBox
/// width `base_width + i - 1`, so width sequences identify page order.
pub fn create_test_pdf(num_pages: usize, base_width: f32) -> LoDocument {
    let mut doc = LoDocument::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let marker = format!("BT /F1 12 Tf (P{}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), marker.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(base_width + i as f32),
                    Object::Real(792.0),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a fixture document into `dir` and return its path
pub fn save_fixture(dir: &TempDir, name: &str, num_pages: usize, base_width: f32) -> PathBuf {
    let mut doc = create_test_pdf(num_pages, base_width);
    let path = dir.path().join(name);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn page_count(path: &Path) -> usize {
    LoDocument::load(path).unwrap().get_pages().len()
}

/// MediaBox widths of all pages, in page order
pub fn page_widths(path: &Path) -> Vec<f32> {
    let doc = LoDocument::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let dict = doc.get_dictionary(id).unwrap();
            let mb = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            object_to_f32(&mb[2]) - object_to_f32(&mb[0])
        })
        .collect()
}

/// Decompressed content stream of page `page` (1-based)
pub fn page_content(path: &Path, page: usize) -> String {
    let doc = LoDocument::load(path).unwrap();
    let pages = doc.get_pages();
    let page_id = pages[&(page as u32)];
    let dict = doc.get_dictionary(page_id).unwrap();
    let content_id = match dict.get(b"Contents").unwrap() {
        Object::Reference(id) => *id,
        other => panic!("unexpected Contents object: {other:?}"),
    };
    let stream = doc.get_object(content_id).unwrap().as_stream().unwrap();
    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Number of XObject resources on page `page` (1-based)
pub fn page_xobject_count(path: &Path, page: usize) -> usize {
    let doc = LoDocument::load(path).unwrap();
    let pages = doc.get_pages();
    let page_id = pages[&(page as u32)];
    let dict = doc.get_dictionary(page_id).unwrap();
    let resources = match dict.get(b"Resources").unwrap() {
        Object::Dictionary(d) => d.clone(),
        Object::Reference(id) => doc.get_dictionary(*id).unwrap().clone(),
        other => panic!("unexpected Resources object: {other:?}"),
    };
    match resources.get(b"XObject") {
        Ok(Object::Dictionary(x)) => x.len(),
        _ => 0,
    }
}

fn object_to_f32(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("not a number: {other:?}"),
    }
}
