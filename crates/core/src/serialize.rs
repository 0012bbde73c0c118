//! HTML reconstruction: export serialization and sandboxed preview.
//!
//! Export output reproduces the document (full-document mode, with the
//! original doctype kept byte-for-byte) or the body's inner markup
//! (fragment mode). The preview variant is always a complete document
//! with a content-security-policy meta tag that disables script execution
//! and plugin embedding, suitable for rendering in an isolated surface.

use crate::document::EditableDocument;
use crate::error::{CopydeckError, Result};

/// Meta tag injected as the first child of `<head>` in preview output
pub const PREVIEW_CSP: &str =
    "<meta http-equiv=\"Content-Security-Policy\" content=\"script-src 'none'; object-src 'none';\">";

/// Render the document back to an HTML string.
///
/// Full-document mode emits the root element prefixed by the doctype
/// captured verbatim from the input, defaulting to `<!DOCTYPE html>` when
/// the input had none. Fragment mode emits the body's inner markup only.
///
/// Re-extracting from the output (with no edits applied) yields the same
/// semantic fields as the original input; attribute order and whitespace
/// normalization inherent to tree serialization may differ.
pub fn serialize_document(doc: &EditableDocument) -> String {
    if doc.is_full_document() {
        let doctype = doc.doctype().unwrap_or("<!DOCTYPE html>");
        format!("{}\n{}", doctype, doc.root_html())
    } else {
        doc.body_inner_html()
    }
}

/// Render a sandboxed preview document.
///
/// Always prefixed with `<!DOCTYPE html>` regardless of the original
/// doctype; the preview is a rendering surface, not an exact export.
/// Fragments are wrapped in a minimal document skeleton.
pub fn render_preview(doc: &EditableDocument) -> Result<String> {
    if doc.is_full_document() {
        let injected = inject_csp(&doc.root_html())?;
        Ok(format!("<!DOCTYPE html>\n{}", injected))
    } else {
        Ok(format!(
            "<!DOCTYPE html><html><head><meta charset=\"UTF-8\">{}</head><body>{}</body></html>",
            PREVIEW_CSP,
            doc.body_inner_html()
        ))
    }
}

/// Prepend the CSP meta tag inside `<head>` via a streaming rewrite
fn inject_csp(html: &str) -> Result<String> {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("head", |el| {
                el.prepend(PREVIEW_CSP, lol_html::html_content::ContentType::Html);
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| CopydeckError::Rewrite(e.to_string()))?;
    rewriter.end().map_err(|e| CopydeckError::Rewrite(e.to_string()))?;

    Ok(output)
}
