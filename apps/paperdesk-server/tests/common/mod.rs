//! Shared helpers for HTTP integration tests

#![allow(dead_code)]

use axum_test::multipart::Part;
use axum_test::TestServer;
use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, Stream};

use paperdesk_server::config::Config;
use paperdesk_server::state::AppState;

/// User password of [`rc4_encrypted`]
pub const RC4_USER_PASSWORD: &str = "secret";

/// A one-page document behind 40-bit RC4 password protection
pub fn rc4_encrypted() -> Vec<u8> {
    include_bytes!("../fixtures/rc4-user-secret.pdf").to_vec()
}

pub fn server() -> TestServer {
    server_with(Config::default())
}

pub fn server_with(config: Config) -> TestServer {
    TestServer::new(paperdesk_server::app(AppState::new(config))).unwrap()
}

/// A PDF with one page per `(width, height)`, each with a visible square
pub fn pdf(sizes: &[(f64, f64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = sizes
        .iter()
        .map(|&(width, height)| {
            let content = doc.add_object(Stream::new(
                dictionary! {},
                b"0 0 1 rg 10 10 20 20 re f".to_vec(),
            ));
            let page = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                "Contents" => Object::Reference(content),
                "Resources" => dictionary! {},
            });
            Object::Reference(page)
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog));

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

pub fn pdf_part(bytes: Vec<u8>, filename: &str) -> Part {
    Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_type("application/pdf")
}

/// Page widths in page order
pub fn page_widths(bytes: &[u8]) -> Vec<f64> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let media_box = doc.get_dictionary(id).unwrap().get(b"MediaBox").unwrap();
            let items = media_box.as_array().unwrap();
            let number = |o: &Object| match o {
                Object::Integer(v) => *v as f64,
                Object::Real(v) => *v as f64,
                other => panic!("not a number: {:?}", other),
            };
            number(&items[2]) - number(&items[0])
        })
        .collect()
}

/// Content operators of a 1-based page
pub fn page_operators(bytes: &[u8], page_number: u32) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages()[&page_number];
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content)
        .unwrap()
        .operations
        .into_iter()
        .map(|op| op.operator)
        .collect()
}
