//! Field extraction walk.
//!
//! This module walks the parsed tree in document (pre-order) order,
//! classifies each element through [`crate::classify`], and emits one
//! [`ContentField`] per editable property it finds. Element ids are handed
//! out by the document's arena, so repeating the walk over the same tree
//! reuses the ids already assigned.

use scraper::{ElementRef, Selector};

use crate::arena::NodeArena;
use crate::classify::{NodeCategory, classify, is_block_tag};
use crate::document::EditableDocument;
use crate::field::{ContentField, FieldProperty};

/// Extract every editable field from the document, in document order.
///
/// An empty result is a valid outcome (nothing editable), not an error.
pub fn extract_fields(doc: &mut EditableDocument) -> Vec<ContentField> {
    let (html, arena) = doc.walk_parts();
    let mut fields = Vec::new();

    let selector = match Selector::parse("body") {
        Ok(selector) => selector,
        Err(_) => return fields,
    };

    if let Some(body) = html.select(&selector).next() {
        for child in body.child_elements() {
            walk(child, arena, &mut fields);
        }
    }

    fields
}

/// Recursive descent over one element; first matching rule wins and an
/// element is never revisited
fn walk(element: ElementRef<'_>, arena: &mut NodeArena, fields: &mut Vec<ContentField>) {
    let tag = element.value().name().to_lowercase();

    match classify(&tag) {
        NodeCategory::Skip => {}
        NodeCategory::MediaContainer => {
            // only immediate children matter inside <picture>
            for child in element.child_elements() {
                match child.value().name().to_lowercase().as_str() {
                    "source" => picture_source_fields(child, arena, fields),
                    "img" => image_fields(child, arena, fields),
                    _ => {}
                }
            }
        }
        NodeCategory::Image => image_fields(element, arena, fields),
        NodeCategory::MediaSource => {
            if let Some(srcset) = non_empty_attr(element, "srcset") {
                push_field(fields, arena, element, FieldProperty::Srcset, srcset, None);
            }
        }
        NodeCategory::Link => {
            if let Some(href) = non_empty_attr(element, "href") {
                push_field(fields, arena, element, FieldProperty::Href, href, None);
            }

            if !has_block_child(element) {
                let text = trimmed_text(element);
                if !text.is_empty() {
                    push_field(fields, arena, element, FieldProperty::TextContent, text, None);
                    return;
                }
            }

            for child in element.child_elements() {
                walk(child, arena, fields);
            }
        }
        NodeCategory::Text => {
            let text = trimmed_text(element);
            if !text.is_empty() {
                push_field(fields, arena, element, FieldProperty::TextContent, text, None);
            }
        }
        NodeCategory::Inline => {
            let text = trimmed_text(element);
            if !has_block_child(element) && !text.is_empty() {
                push_field(fields, arena, element, FieldProperty::TextContent, text, None);
            } else {
                for child in element.child_elements() {
                    walk(child, arena, fields);
                }
            }
        }
        NodeCategory::Container => {
            for child in element.child_elements() {
                walk(child, arena, fields);
            }
        }
    }
}

/// src (falling back to srcset) plus an independent alt field.
///
/// An empty alt attribute still yields a field: it marks the image as
/// decorative and is as editable as any other value.
fn image_fields(element: ElementRef<'_>, arena: &mut NodeArena, fields: &mut Vec<ContentField>) {
    if let Some(src) = non_empty_attr(element, "src") {
        push_field(fields, arena, element, FieldProperty::Src, src, None);
    } else if let Some(srcset) = non_empty_attr(element, "srcset") {
        push_field(fields, arena, element, FieldProperty::Srcset, srcset, None);
    }

    if let Some(alt) = element.attr("alt") {
        push_field(fields, arena, element, FieldProperty::Alt, alt.to_string(), None);
    }
}

/// srcset field for a `source` inside `<picture>`, labeled by its media query
fn picture_source_fields(element: ElementRef<'_>, arena: &mut NodeArena, fields: &mut Vec<ContentField>) {
    let Some(srcset) = non_empty_attr(element, "srcset") else {
        return;
    };

    let label = match non_empty_attr(element, "media") {
        Some(media) => format!("Image Source \u{2014} {}", media),
        None => "Image Source".to_string(),
    };

    push_field(fields, arena, element, FieldProperty::Srcset, srcset, Some(label));
}

fn push_field(
    fields: &mut Vec<ContentField>, arena: &mut NodeArena, element: ElementRef<'_>, property: FieldProperty,
    value: String, label: Option<String>,
) {
    let id = arena.assign(element.id());
    let tag = element.value().name().to_lowercase();

    let field = match label {
        Some(label) => ContentField::with_label(id, &tag, property, value, label),
        None => ContentField::new(id, &tag, property, value),
    };

    fields.push(field);
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.attr(name).filter(|value| !value.is_empty()).map(str::to_string)
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn has_block_child(element: ElementRef<'_>) -> bool {
    element.child_elements().any(|child| is_block_tag(&child.value().name().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<ContentField> {
        let mut doc = EditableDocument::parse(html).unwrap();
        extract_fields(&mut doc)
    }

    #[test]
    fn test_single_paragraph() {
        let fields = extract("<body><p>Hello</p></body>");

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].property, FieldProperty::TextContent);
        assert_eq!(fields[0].value, "Hello");
        assert_eq!(fields[0].tag, "p");
    }

    #[test]
    fn test_image_src_and_alt_share_element() {
        let fields = extract("<body><img src=\"a.png\" alt=\"b\"></body>");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].property, FieldProperty::Src);
        assert_eq!(fields[0].value, "a.png");
        assert_eq!(fields[1].property, FieldProperty::Alt);
        assert_eq!(fields[1].value, "b");
        assert_eq!(fields[0].element_id, fields[1].element_id);
    }

    #[test]
    fn test_empty_alt_is_still_a_field() {
        let fields = extract("<body><img src=\"a.png\" alt=\"\"></body>");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].property, FieldProperty::Alt);
        assert_eq!(fields[1].value, "");
    }

    #[test]
    fn test_img_falls_back_to_srcset() {
        let fields = extract("<body><img srcset=\"a.png 1x, b.png 2x\"></body>");

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].property, FieldProperty::Srcset);
        assert_eq!(fields[0].label, "Image URL");
    }

    #[test]
    fn test_skip_tags_contribute_nothing() {
        let fields = extract("<body><script>var x = 'Hello';</script><style>p { color: red; }</style></body>");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_picture_children() {
        let fields = extract(concat!(
            "<body><picture>",
            "<source media=\"(max-width: 600px)\" srcset=\"small.png\">",
            "<source srcset=\"large.png\">",
            "<img src=\"fallback.png\" alt=\"photo\">",
            "</picture></body>",
        ));

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].label, "Image Source \u{2014} (max-width: 600px)");
        assert_eq!(fields[1].label, "Image Source");
        assert_eq!(fields[2].property, FieldProperty::Src);
        assert_eq!(fields[3].property, FieldProperty::Alt);
    }

    #[test]
    fn test_plain_link_is_one_text_field() {
        let fields = extract("<body><a href=\"/x\">Click <em>here</em></a></body>");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].property, FieldProperty::Href);
        assert_eq!(fields[1].property, FieldProperty::TextContent);
        assert_eq!(fields[1].value, "Click here");
        assert_eq!(fields[0].element_id, fields[1].element_id);
    }

    #[test]
    fn test_block_link_recurses() {
        let fields = extract("<body><a href=\"/x\"><h2>Title</h2><p>Teaser</p></a></body>");

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].property, FieldProperty::Href);
        assert_eq!(fields[1].tag, "h2");
        assert_eq!(fields[2].tag, "p");
        // the link's own text is not separately editable
        assert!(fields.iter().filter(|f| f.tag == "a").all(|f| f.property == FieldProperty::Href));
    }

    #[test]
    fn test_text_tag_stops_descent() {
        let fields = extract("<body><p>Hello <a href=\"/x\">link</a></p></body>");

        // the paragraph swallows the whole subtree text; no nested link fields
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].tag, "p");
        assert_eq!(fields[0].value, "Hello link");
    }

    #[test]
    fn test_leaf_span_and_structural_span() {
        let fields = extract("<body><span>Badge</span><span><p>Nested</p></span></body>");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].tag, "span");
        assert_eq!(fields[0].value, "Badge");
        assert_eq!(fields[1].tag, "p");
        assert_eq!(fields[1].value, "Nested");
    }

    #[test]
    fn test_document_order_and_unique_ids() {
        let fields = extract(concat!(
            "<body><div><h1>A</h1><p>B</p></div>",
            "<div><img src=\"c.png\" alt=\"C\"><a href=\"/d\">D</a></div></body>",
        ));

        let values: Vec<&str> = fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["A", "B", "c.png", "C", "/d", "D"]);

        let mut ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), fields.len());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let mut doc = EditableDocument::parse("<body><h1>A</h1><p>B</p><img src=\"c.png\"></body>").unwrap();

        let first = extract_fields(&mut doc);
        let second = extract_fields(&mut doc);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.element_id, b.element_id);
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_whitespace_only_text_is_skipped() {
        let fields = extract("<body><p>   \n\t  </p><h2></h2></body>");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_empty_href_is_skipped() {
        let fields = extract("<body><a href=\"\">text</a></body>");

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].property, FieldProperty::TextContent);
    }
}
