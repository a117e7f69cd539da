//! Document rendering.
//!
//! Turns stored bytes into a response body and content type according to the
//! document's [`ContentKind`]. Markdown goes through `pulldown-cmark` with the
//! tables extension; everything else is passed through untouched.

use pulldown_cmark::{Options, Parser, html};

use crate::document::{ContentKind, Document};

/// Content type for plain-text documents.
pub const TEXT_PLAIN: &str = "text/plain";

/// Default content type for rendered pages and raw documents.
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// A rendered document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Response body bytes.
    pub body: Vec<u8>,
    /// Value for the `Content-Type` header.
    pub content_type: &'static str,
}

/// Render raw `content` of the given kind.
#[must_use]
pub fn render(content: &[u8], kind: ContentKind) -> Rendered {
    match kind {
        ContentKind::PlainText => Rendered {
            body: content.to_vec(),
            content_type: TEXT_PLAIN,
        },
        ContentKind::Markdown => Rendered {
            body: markdown_to_html(&String::from_utf8_lossy(content)).into_bytes(),
            content_type: TEXT_HTML,
        },
        ContentKind::Raw => Rendered {
            body: content.to_vec(),
            content_type: TEXT_HTML,
        },
    }
}

/// Render a document read from the store.
#[must_use]
pub fn render_document(doc: &Document) -> Rendered {
    render(&doc.content, doc.kind)
}

/// Convert markdown source to an HTML fragment.
#[must_use]
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES);
    let mut out = String::with_capacity(source.len().saturating_mul(2));
    html::push_html(&mut out, parser);
    out
}
