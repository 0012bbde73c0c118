//! Editable field and field group types.
//!
//! This module defines [`ContentField`], the unit of editable content the
//! extractor emits, and [`FieldGroup`], the labeled clusters the grouper
//! partitions fields into. Both serialize to camelCase JSON so field ids
//! and values can round-trip through external session storage.

use serde::Serialize;

/// The semantic property of an element that a field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldProperty {
    /// The element's entire subtree text
    TextContent,
    /// Link target of an anchor
    Href,
    /// Image source URL
    Src,
    /// Source set of an `img` or `source` element
    Srcset,
    /// Alternative text of an image (empty string is meaningful)
    Alt,
}

impl FieldProperty {
    /// The property name as it appears in field ids and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldProperty::TextContent => "textContent",
            FieldProperty::Href => "href",
            FieldProperty::Src => "src",
            FieldProperty::Srcset => "srcset",
            FieldProperty::Alt => "alt",
        }
    }

    /// Parse a property name from a field id suffix
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "textContent" => Some(FieldProperty::TextContent),
            "href" => Some(FieldProperty::Href),
            "src" => Some(FieldProperty::Src),
            "srcset" => Some(FieldProperty::Srcset),
            "alt" => Some(FieldProperty::Alt),
            _ => None,
        }
    }

    /// Whether the property carries a URL and must pass the unsafe-scheme check
    pub fn is_url(&self) -> bool {
        matches!(self, FieldProperty::Href | FieldProperty::Src | FieldProperty::Srcset)
    }

    /// The attribute name this property maps to, if it is attribute-backed
    pub fn attr_name(&self) -> Option<&'static str> {
        match self {
            FieldProperty::TextContent => None,
            FieldProperty::Href => Some("href"),
            FieldProperty::Src => Some("src"),
            FieldProperty::Srcset => Some("srcset"),
            FieldProperty::Alt => Some("alt"),
        }
    }
}

/// One editable unit of content.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentField {
    /// Unique field id, formed as `<elementId>-<property>`
    pub id: String,
    /// Stable identifier of the owning element
    pub element_id: usize,
    /// Lower-cased tag name of the owning element
    pub tag: String,
    /// The semantic property being edited
    pub property: FieldProperty,
    /// Human-readable field name derived from tag and property
    pub label: String,
    /// Immutable snapshot of the value at parse time
    pub original_value: String,
    /// Current, possibly edited value
    pub value: String,
    /// Id of the owning group, set by the grouper
    pub group_id: String,
}

impl ContentField {
    /// Create a field with a label derived from tag and property
    pub fn new(element_id: usize, tag: &str, property: FieldProperty, value: String) -> Self {
        let label = field_label(tag, property);
        Self::with_label(element_id, tag, property, value, label)
    }

    /// Create a field with an explicit label
    pub fn with_label(element_id: usize, tag: &str, property: FieldProperty, value: String, label: String) -> Self {
        Self {
            id: format!("{}-{}", element_id, property.as_str()),
            element_id,
            tag: tag.to_string(),
            property,
            label,
            original_value: value.clone(),
            value,
            group_id: String::new(),
        }
    }

    /// Whether the field still holds its parse-time value
    pub fn is_unchanged(&self) -> bool {
        self.value == self.original_value
    }
}

/// An ordered set of related fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    /// `"general"` or `"card-<n>"`
    pub id: String,
    /// Derived heading/alt/link text, or a `"Section N"` fallback
    pub label: String,
    /// Member fields in document order
    pub fields: Vec<ContentField>,
}

/// Derive the display label for a field from its tag and property
pub fn field_label(tag: &str, property: FieldProperty) -> String {
    match property {
        FieldProperty::Href => return "Link URL".to_string(),
        FieldProperty::Src => return "Image URL".to_string(),
        FieldProperty::Srcset => {
            return if tag == "source" { "Source URL".to_string() } else { "Image URL".to_string() };
        }
        FieldProperty::Alt => return "Image Alt Text".to_string(),
        FieldProperty::TextContent => {}
    }

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => format!("Heading ({})", tag),
        "p" => "Paragraph".to_string(),
        "a" => "Link Text".to_string(),
        "button" => "Button Text".to_string(),
        "span" => "Text".to_string(),
        "li" => "List Item".to_string(),
        "td" | "th" => "Table Cell".to_string(),
        "label" => "Label".to_string(),
        "figcaption" => "Caption".to_string(),
        _ => "Text".to_string(),
    }
}
