//! Element classification for the extraction walk.
//!
//! Each element the extractor visits falls into exactly one
//! [`NodeCategory`], which decides whether the walk emits fields for it,
//! recurses into its children, or skips the subtree entirely. Keeping the
//! table here makes the classification rules testable on their own,
//! independent of the traversal.

/// How the extractor treats an element with a given tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Element and its whole subtree contribute no fields
    Skip,
    /// `picture`: only immediate `source`/`img` children are inspected
    MediaContainer,
    /// `img`: src (or srcset) plus an independent alt field
    Image,
    /// Standalone `source`: srcset field if present
    MediaSource,
    /// `a`: href field plus either a single text field or recursion
    Link,
    /// Pure text tags: one field covering the whole subtree text
    Text,
    /// `span`/`button`: text field only when leaf-like, else recursion
    Inline,
    /// Everything else: recurse into each direct child
    Container,
}

/// Tags whose subtrees never contain user-editable content
const SKIP_TAGS: &[&str] = &[
    "style", "script", "noscript", "svg", "head", "meta", "link", "title", "base", "template",
];

/// Tags whose entire subtree text is edited as one field
const TEXT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "td", "th", "dt", "dd", "blockquote", "figcaption", "label",
    "caption",
];

/// Block-level tags, used to decide whether a link or inline element
/// wraps structural content (recurse) or plain text (single field)
const BLOCK_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article", "aside", "main", "nav", "header", "footer",
    "ul", "ol", "li", "table", "form", "fieldset", "details", "figure", "blockquote", "pre", "dl", "address",
];

/// Classify a lower-cased tag name.
///
/// First match wins and the category never changes for a given tag, so the
/// walk visits each element exactly once.
pub fn classify(tag: &str) -> NodeCategory {
    if SKIP_TAGS.contains(&tag) {
        return NodeCategory::Skip;
    }

    match tag {
        "picture" => NodeCategory::MediaContainer,
        "img" => NodeCategory::Image,
        "source" => NodeCategory::MediaSource,
        "a" => NodeCategory::Link,
        "span" | "button" => NodeCategory::Inline,
        _ if TEXT_TAGS.contains(&tag) => NodeCategory::Text,
        _ => NodeCategory::Container,
    }
}

/// Check whether a tag is block-level
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}
