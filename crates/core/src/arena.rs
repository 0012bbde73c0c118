use ego_tree::NodeId;

use std::collections::HashMap;

/// Stable integer identifier for an element, unique within one document.
///
/// Ids are assigned in traversal order during extraction and survive
/// repeated extraction passes over the same tree, so edits keyed by id
/// keep resolving to the same node.
pub type ElementId = usize;

/// Bidirectional map between element ids and tree node ids.
///
/// The arena is built during extraction and reused by grouping, editing,
/// and serialization. Keeping the bookkeeping here means nodes carry no
/// injected attributes that would later need stripping from the output.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    by_element: HashMap<ElementId, NodeId>,
    by_node: HashMap<NodeId, ElementId>,
    next_id: ElementId,
}

impl NodeArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id already assigned to a node, or assign the next one.
    ///
    /// Assignment is idempotent: calling this again for the same node
    /// returns the original id without advancing the counter, so a second
    /// extraction pass over an already-registered tree causes no id drift.
    pub fn assign(&mut self, node: NodeId) -> ElementId {
        if let Some(&existing) = self.by_node.get(&node) {
            return existing;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_node.insert(node, id);
        self.by_element.insert(id, node);
        id
    }

    /// Resolve an element id back to its tree node
    pub fn node(&self, element: ElementId) -> Option<NodeId> {
        self.by_element.get(&element).copied()
    }

    /// Look up the id assigned to a node, if any
    pub fn element_id(&self, node: NodeId) -> Option<ElementId> {
        self.by_node.get(&node).copied()
    }

    /// Get the number of registered elements
    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }
}
