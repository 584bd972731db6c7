//! PDF loader tests

use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use primer_rag::{PdfLoader, RagError};
use std::path::Path;

fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn test_one_document_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    write_pdf(&path, &["Markets rallied", "Bonds were flat", "Outlook"]);

    let docs = PdfLoader::new(&path).load().unwrap();
    assert_eq!(docs.len(), 3);

    let source = path.display().to_string();
    for (i, doc) in docs.iter().enumerate() {
        assert_eq!(doc.metadata["page"], i.to_string());
        assert_eq!(doc.metadata["source"], source);
        assert_eq!(doc.id, format!("{source}#page={i}"));
    }
}

#[test]
fn test_missing_file() {
    let err = PdfLoader::new("materials/does-not-exist.pdf").load().unwrap_err();
    assert!(matches!(err, RagError::FileNotFound(ref p) if p == "materials/does-not-exist.pdf"));
}

#[test]
fn test_not_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, "just some text").unwrap();

    let err = PdfLoader::new(&path).load().unwrap_err();
    assert!(matches!(err, RagError::LoadError(_)));
}
