//! Structural grouping of extracted fields.
//!
//! Fields are partitioned into repeated "card" groups and a general
//! bucket. A card is detected when at least two sibling elements each
//! contain two or more fields in their subtree, which catches repeated
//! structures (item lists, feature grids) while leaving isolated
//! multi-field containers in the general bucket.
//!
//! The algorithm runs as linear traversals over the tree: one reverse
//! pre-order pass accumulates subtree field counts, one pre-order pass
//! resolves each element's nearest enclosing card, so deep trees do not
//! pay a per-field ancestor-chain walk.

use ego_tree::NodeId;
use scraper::ElementRef;

use std::collections::{HashMap, HashSet};

use crate::document::EditableDocument;
use crate::field::{ContentField, FieldGroup};

/// Minimum sibling elements that must qualify before any of them becomes a card
const CARD_MIN_SIBLINGS: usize = 2;

/// Minimum subtree field count for a sibling to qualify as a card root
const CARD_MIN_FIELDS: usize = 2;

/// Group labels longer than this are cut off with an ellipsis
const LABEL_MAX_CHARS: usize = 60;

/// Partition fields into labeled groups; deterministic for identical input.
///
/// The general group, when non-empty, always comes first; card groups
/// follow in order of their first field in the document. Zero fields in
/// means zero groups out.
pub fn group_fields(doc: &EditableDocument, mut fields: Vec<ContentField>) -> Vec<FieldGroup> {
    if fields.is_empty() {
        return Vec::new();
    }

    let html = doc.html();
    let arena = doc.arena();

    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    for field in &fields {
        if let Some(node) = arena.node(field.element_id) {
            *counts.entry(node).or_default() += 1;
        }
    }

    // pre-order element list; reversing it visits children before parents
    let order: Vec<NodeId> = html
        .root_element()
        .descendants()
        .filter(|node| node.value().is_element())
        .map(|node| node.id())
        .collect();

    for node_id in order.iter().rev() {
        let Some(&count) = counts.get(node_id) else {
            continue;
        };
        if count == 0 {
            continue;
        }
        if let Some(parent) = html.tree.get(*node_id).and_then(|node| node.parent())
            && parent.value().is_element()
        {
            *counts.entry(parent.id()).or_default() += count;
        }
    }

    let card_roots = detect_card_roots(html, &counts);

    // nearest enclosing card per element
    let mut nearest: HashMap<NodeId, NodeId> = HashMap::new();

    for node_id in &order {
        if card_roots.contains(node_id) {
            nearest.insert(*node_id, *node_id);
        } else if let Some(parent) = html.tree.get(*node_id).and_then(|node| node.parent())
            && let Some(&card) = nearest.get(&parent.id())
        {
            nearest.insert(*node_id, card);
        }
    }

    // cards are ordered by their first assigned field, so a nested card
    // whose fields precede its ancestor's own fields comes out first
    let mut by_card: HashMap<NodeId, Vec<ContentField>> = HashMap::new();
    let mut ordered_cards: Vec<NodeId> = Vec::new();
    let mut general: Vec<ContentField> = Vec::new();

    for field in fields.drain(..) {
        let card = arena.node(field.element_id).and_then(|node| nearest.get(&node)).copied();
        match card {
            Some(card) => {
                if !by_card.contains_key(&card) {
                    ordered_cards.push(card);
                }
                by_card.entry(card).or_default().push(field);
            }
            None => general.push(field),
        }
    }

    let mut groups: Vec<FieldGroup> = Vec::new();

    if !general.is_empty() {
        for field in &mut general {
            field.group_id = "general".to_string();
        }
        groups.push(FieldGroup { id: "general".to_string(), label: "General".to_string(), fields: general });
    }

    for card in ordered_cards {
        let Some(mut card_fields) = by_card.remove(&card) else {
            continue;
        };

        let index = groups.len();
        let id = format!("card-{}", index);
        for field in &mut card_fields {
            field.group_id = id.clone();
        }

        let label = html
            .tree
            .get(card)
            .and_then(ElementRef::wrap)
            .map(|element| derive_group_label(element, index))
            .unwrap_or_else(|| format!("Section {}", index + 1));

        groups.push(FieldGroup { id, label, fields: card_fields });
    }

    groups
}

/// Mark every sibling set where at least two members each hold two or
/// more fields
fn detect_card_roots(html: &scraper::Html, counts: &HashMap<NodeId, usize>) -> HashSet<NodeId> {
    let mut card_roots: HashSet<NodeId> = HashSet::new();

    for (&node_id, &count) in counts {
        if count == 0 {
            continue;
        }
        let Some(parent) = html.tree.get(node_id).and_then(|node| node.parent()) else {
            continue;
        };
        let Some(parent_element) = ElementRef::wrap(parent) else {
            continue;
        };

        let qualifying: Vec<NodeId> = parent_element
            .child_elements()
            .filter(|child| counts.get(&child.id()).copied().unwrap_or(0) >= CARD_MIN_FIELDS)
            .map(|child| child.id())
            .collect();

        if qualifying.len() >= CARD_MIN_SIBLINGS {
            card_roots.extend(qualifying);
        }
    }

    card_roots
}

/// Label a card from its first heading, image alt, or link text, with a
/// numbered fallback
fn derive_group_label(root: ElementRef<'_>, index: usize) -> String {
    const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

    if let Some(heading) = descendant_elements(root).find(|el| HEADING_TAGS.contains(&el.value().name())) {
        let text = heading.text().collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            return truncate_label(text);
        }
    }

    if let Some(image) = descendant_elements(root).find(|el| el.value().name() == "img" && el.attr("alt").is_some()) {
        let alt = image.attr("alt").unwrap_or_default();
        let alt = alt.trim();
        if !alt.is_empty() {
            return truncate_label(alt);
        }
    }

    if let Some(link) = descendant_elements(root).find(|el| el.value().name() == "a") {
        let text = link.text().collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            return truncate_label(text);
        }
    }

    format!("Section {}", index + 1)
}

fn descendant_elements(root: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Cut a label to at most [`LABEL_MAX_CHARS`] characters, never splitting
/// a character, and mark the cut with an ellipsis
fn truncate_label(text: &str) -> String {
    if text.chars().count() <= LABEL_MAX_CHARS {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(LABEL_MAX_CHARS).collect();
    truncated.push('\u{2026}');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_fields;

    fn groups_for(html: &str) -> Vec<FieldGroup> {
        let mut doc = EditableDocument::parse(html).unwrap();
        let fields = extract_fields(&mut doc);
        group_fields(&doc, fields)
    }

    #[test]
    fn test_sibling_cards_with_no_general() {
        let groups = groups_for("<body><div><h2>A</h2><p>1</p></div><div><h2>B</h2><p>2</p></div></body>");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "A");
        assert_eq!(groups[0].id, "card-0");
        assert_eq!(groups[1].label, "B");
        assert_eq!(groups[1].id, "card-1");
        assert_eq!(groups[0].fields.len(), 2);
        assert_eq!(groups[1].fields.len(), 2);
    }

    #[test]
    fn test_isolated_container_stays_general() {
        // a multi-field container with no structural twin is not a card
        let groups = groups_for("<body><div><h2>Only</h2><p>child</p></div><p>aside</p></body>");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "general");
        assert_eq!(groups[0].fields.len(), 3);
    }

    #[test]
    fn test_general_comes_first_and_numbering_continues() {
        let groups = groups_for(concat!(
            "<body><h1>Page title</h1>",
            "<section><div><h3>One</h3><p>1</p></div><div><h3>Two</h3><p>2</p></div></section></body>",
        ));

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].id, "general");
        assert_eq!(groups[1].id, "card-1");
        assert_eq!(groups[1].label, "One");
        assert_eq!(groups[2].id, "card-2");
        assert_eq!(groups[2].label, "Two");
    }

    #[test]
    fn test_every_field_belongs_to_exactly_one_group() {
        let groups = groups_for(concat!(
            "<body><p>intro</p>",
            "<ul><li><a href=\"/a\">A</a></li></ul>",
            "<div><div><h2>X</h2><p>x</p></div><div><h2>Y</h2><p>y</p></div></div></body>",
        ));

        let mut seen: Vec<String> = Vec::new();
        for group in &groups {
            for field in &group.fields {
                assert_eq!(field.group_id, group.id);
                seen.push(field.id.clone());
            }
        }
        seen.sort_unstable();
        seen.dedup();

        let mut doc = EditableDocument::parse(concat!(
            "<body><p>intro</p>",
            "<ul><li><a href=\"/a\">A</a></li></ul>",
            "<div><div><h2>X</h2><p>x</p></div><div><h2>Y</h2><p>y</p></div></div></body>",
        ))
        .unwrap();
        let all = extract_fields(&mut doc);
        assert_eq!(seen.len(), all.len());
    }

    #[test]
    fn test_label_falls_back_to_image_alt_then_link() {
        let groups = groups_for(concat!(
            "<body><div>",
            "<div><img src=\"a.png\" alt=\"First photo\"><p>text</p></div>",
            "<div><a href=\"/b\">Second link</a><p>text</p></div>",
            "</div></body>",
        ));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "First photo");
        assert_eq!(groups[1].label, "Second link");
    }

    #[test]
    fn test_label_falls_back_to_section_number() {
        let groups = groups_for(concat!(
            "<body><div>",
            "<div><p>one</p><p>two</p></div>",
            "<div><p>three</p><p>four</p></div>",
            "</div></body>",
        ));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Section 1");
        assert_eq!(groups[1].label, "Section 2");
    }

    #[test]
    fn test_label_truncation() {
        let long = "x".repeat(80);
        let html = format!(
            "<body><div><div><h2>{}</h2><p>1</p></div><div><h2>B</h2><p>2</p></div></div></body>",
            long
        );
        let groups = groups_for(&html);

        assert_eq!(groups[0].label.chars().count(), 61);
        assert!(groups[0].label.ends_with('\u{2026}'));
    }

    #[test]
    fn test_nearest_card_wins_for_nested_structures() {
        // inner pair of cards sits inside an outer pair of cards
        let inner = "<div><div><h4>i1</h4><p>a</p></div><div><h4>i2</h4><p>b</p></div></div>";
        let html = format!(
            "<body><div><div><h2>Outer A</h2><p>x</p>{}</div><div><h2>Outer B</h2><p>y</p></div></div></body>",
            inner
        );
        let groups = groups_for(&html);

        let inner_group = groups.iter().find(|g| g.label == "i1").expect("inner card group");
        assert!(inner_group.fields.iter().all(|f| f.tag == "h4" || f.tag == "p"));

        let outer_a = groups.iter().find(|g| g.label == "Outer A").expect("outer card group");
        assert!(outer_a.fields.iter().any(|f| f.value == "Outer A"));
        assert!(outer_a.fields.iter().all(|f| f.value != "i1"));
    }

    #[test]
    fn test_empty_fields_give_empty_groups() {
        let doc = EditableDocument::parse("<body></body>").unwrap();
        assert!(group_fields(&doc, Vec::new()).is_empty());
    }
}
