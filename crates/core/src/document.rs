//! Parsed document model with stable element addressing.
//!
//! This module provides [`EditableDocument`], the in-memory HTML tree that
//! extraction, grouping, editing, and serialization all operate on. Nodes
//! are addressed through a [`NodeArena`] of stable integer ids instead of
//! attributes stamped onto the markup, so serialized output needs no
//! cleanup pass.
//!
//! # Example
//!
//! ```rust
//! use copydeck_core::document::EditableDocument;
//!
//! let doc = EditableDocument::parse("<p>Hello</p>").unwrap();
//! assert!(!doc.is_full_document());
//! ```

use ego_tree::NodeId;
use regex::Regex;
use scraper::node::{Node, Text};
use scraper::{ElementRef, Html, Selector};

use std::sync::LazyLock;

use crate::Result;
use crate::arena::{ElementId, NodeArena};

/// Input contains an `<html>` tag and is serialized as a whole document
static FULL_DOCUMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<html[\s>]").expect("valid regex"));

/// Doctype declaration at the start of the input, captured verbatim
static DOCTYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*(<!doctype[^>]*>)").expect("valid regex"));

/// A parsed HTML document that supports keyed in-place edits.
///
/// The document keeps the verbatim input around for doctype preservation
/// and owns the id arena built during extraction. A new parse replaces the
/// whole document; old element ids do not carry over.
pub struct EditableDocument {
    html: Html,
    arena: NodeArena,
    original_html: String,
    is_full_document: bool,
}

impl EditableDocument {
    /// Parses HTML from a string.
    ///
    /// The parser recovers from malformed markup the way browsers do, so
    /// fragments and full documents both produce a usable tree. Whether the
    /// input counts as a full document is decided by the presence of an
    /// `<html>` tag in the raw input, not the synthesized tree.
    ///
    /// # Example
    ///
    /// ```rust
    /// use copydeck_core::document::EditableDocument;
    ///
    /// let doc = EditableDocument::parse("<html><body><p>Hi</p></body></html>").unwrap();
    /// assert!(doc.is_full_document());
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let tree = Html::parse_document(html);

        Ok(Self {
            html: tree,
            arena: NodeArena::new(),
            original_html: html.to_string(),
            is_full_document: FULL_DOCUMENT.is_match(html),
        })
    }

    /// Whether the input contained an `<html>` tag
    pub fn is_full_document(&self) -> bool {
        self.is_full_document
    }

    /// Gets the verbatim input the document was parsed from
    pub fn original_html(&self) -> &str {
        &self.original_html
    }

    /// Gets the doctype declaration captured verbatim from the input, if any
    pub fn doctype(&self) -> Option<&str> {
        DOCTYPE.captures(&self.original_html).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }

    /// Gets the underlying `scraper::Html` instance
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the id arena built by extraction
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Splits the document into the tree and a mutable arena for the
    /// extraction walk
    pub(crate) fn walk_parts(&mut self) -> (&Html, &mut NodeArena) {
        (&self.html, &mut self.arena)
    }

    /// Gets the `<body>` element (synthesized by the parser if absent)
    pub fn body(&self) -> Option<ElementRef<'_>> {
        let selector = Selector::parse("body").ok()?;
        self.html.select(&selector).next()
    }

    /// Gets the outer HTML of the root `<html>` element
    pub fn root_html(&self) -> String {
        self.html.root_element().html()
    }

    /// Gets the inner HTML of the `<body>` element
    pub fn body_inner_html(&self) -> String {
        self.body().map(|body| body.inner_html()).unwrap_or_default()
    }

    /// Resolves a stable element id to its element, if it is still present
    pub fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        let node = self.arena.node(id)?;
        ElementRef::wrap(self.html.tree.get(node)?)
    }

    /// Replaces the entire subtree of an element with a single text node.
    ///
    /// Returns false when the id does not resolve to a live element, in
    /// which case nothing is modified.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        let Some(node_id) = self.arena.node(id) else {
            return false;
        };
        let child_ids: Vec<NodeId> = match self.html.tree.get(node_id) {
            Some(node) if node.value().is_element() => node.children().map(|child| child.id()).collect(),
            _ => return false,
        };

        for child in child_ids {
            if let Some(mut child) = self.html.tree.get_mut(child) {
                child.detach();
            }
        }

        if let Some(mut node) = self.html.tree.get_mut(node_id) {
            node.append(Node::Text(Text { text: text.into() }));
            return true;
        }

        false
    }

    /// Sets an attribute on an element, creating it if it was removed.
    ///
    /// Returns false when the id does not resolve to a live element.
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) -> bool {
        let Some(node_id) = self.arena.node(id) else {
            return false;
        };
        let Some(mut node) = self.html.tree.get_mut(node_id) else {
            return false;
        };
        let Node::Element(element) = node.value() else {
            return false;
        };

        if let Some((_, existing)) = element.attrs.iter_mut().find(|(key, _)| key.local.as_ref() == name) {
            *existing = value.into();
            return true;
        }

        // scraper does not re-export html5ever's QualName, so borrow an
        // attribute key of the right name from a throwaway fragment
        let probe = Html::parse_fragment(&format!("<i {}=\"\"></i>", name));
        let key = probe
            .tree
            .nodes()
            .filter_map(|node| node.value().as_element())
            .flat_map(|probe_element| probe_element.attrs.keys())
            .next()
            .cloned();

        match key {
            Some(key) => {
                element.attrs.insert(key, value.into());
                true
            }
            None => false,
        }
    }

    /// Removes an attribute from an element.
    ///
    /// Removing an attribute that is already absent is a successful no-op.
    /// Returns false only when the id does not resolve to a live element.
    pub fn remove_attr(&mut self, id: ElementId, name: &str) -> bool {
        let Some(node_id) = self.arena.node(id) else {
            return false;
        };
        let Some(mut node) = self.html.tree.get_mut(node_id) else {
            return false;
        };
        let Node::Element(element) = node.value() else {
            return false;
        };

        element.attrs.retain(|key, _| key.local.as_ref() != name);
        true
    }
}
