// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, event-relevant queries.

use crate::types::{NodeId, NodeKind};

/// Event types of the focus family. Character data never receives these.
const FOCUS_EVENTS: &[&str] = &["focus", "blur", "focusin", "focusout"];

/// Mouse activation event types suppressed on disabled form controls.
const MOUSE_ACTIVATION_EVENTS: &[&str] = &[
    "click",
    "dblclick",
    "auxclick",
    "contextmenu",
    "mousedown",
    "mouseup",
];

/// Elements that can carry the `disabled` state.
const DISABLEABLE: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

/// Elements a `<label>` can be associated with.
const LABELABLE: &[&str] = &[
    "button", "input", "meter", "output", "progress", "select", "textarea",
];

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An arena-backed document tree.
///
/// The document node is created by [`Document::new`] and is the root of the
/// connected tree. Other nodes are created detached and attached with
/// [`Document::append_child`] or [`Document::insert_before`].
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    attrs: Vec<(String, String)>,
}

impl Node {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            kind,
            attrs: Vec::new(),
        }
    }
}

impl Document {
    /// Create a document containing only the document node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
        };
        doc.root = doc.alloc(NodeKind::Document);
        doc
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element. The tag name is lower-cased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Text(data.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    ///
    /// Returns `false` (and changes nothing) if either id is stale, if `child`
    /// is the document node, or if the insertion would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, or last when
    /// `reference` is `None` or not a child of `parent`.
    ///
    /// Same failure rules as [`Document::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) || child == self.root {
            return false;
        }
        if self.node(parent).kind.is_character_data() || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        self.detach(child);
        let siblings = &mut self.node_mut(parent).children;
        let pos = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.node_mut(child).parent = Some(parent);
        true
    }

    /// Unlink `id` from its parent. The node and its subtree stay alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    /// Remove a node (and its subtree) from the document.
    ///
    /// The document node itself cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if `id` is the document node or one of its descendants.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Children of a live node, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| &n.children)
    }

    /// Kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Tag name of a live element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.kind(id)?.tag()
    }

    /// Set an attribute on an element. Names are lower-cased.
    /// Ignored for non-elements and stale ids.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(n) = self.get_mut(id) else {
            return;
        };
        if n.kind.tag().is_none() {
            return;
        }
        let name = name.to_ascii_lowercase();
        match n.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.into(),
            None => n.attrs.push((name, value.into())),
        }
    }

    /// Read an attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let n = self.get_mut(id)?;
        let pos = n.attrs.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(n.attrs.remove(pos).1)
    }

    /// First connected element in tree order whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(value))
    }

    /// Whether `node` reacts to events of `event_type` at all.
    ///
    /// Character data does not take focus, and disabled form controls swallow
    /// mouse activation.
    pub fn handles(&self, node: NodeId, event_type: &str) -> bool {
        let Some(kind) = self.kind(node) else {
            return false;
        };
        if kind.is_character_data() {
            return !contains_ignore_case(FOCUS_EVENTS, event_type);
        }
        if contains_ignore_case(MOUSE_ACTIVATION_EVENTS, event_type) && self.is_disabled(node) {
            log::trace!("{event_type} suppressed on disabled control {node:?}");
            return false;
        }
        true
    }

    /// Whether a form control is disabled, either directly or through a
    /// disabled `<fieldset>` ancestor (outside that fieldset's first legend).
    pub fn is_disabled(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag_name(node) else {
            return false;
        };
        if !DISABLEABLE.contains(&tag) {
            return false;
        }
        if self.attribute(node, "disabled").is_some() {
            return true;
        }
        let mut child = node;
        while let Some(parent) = self.parent(child) {
            if self.tag_name(parent) == Some("fieldset")
                && self.attribute(parent, "disabled").is_some()
                && self.first_legend(parent) != Some(child)
            {
                return true;
            }
            child = parent;
        }
        false
    }

    /// Returns true for `<label>` elements.
    pub fn is_label(&self, node: NodeId) -> bool {
        self.tag_name(node) == Some("label")
    }

    /// The control a `<label>` is associated with.
    ///
    /// A `for` attribute names the control by id (only labelable elements
    /// qualify); without one, the first labelable descendant is used.
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        if !self.is_label(label) {
            return None;
        }
        if let Some(for_id) = self.attribute(label, "for") {
            return self
                .element_by_id(for_id)
                .filter(|&n| self.is_labelable(n));
        }
        self.descendants(label)
            .into_iter()
            .skip(1)
            .find(|&n| self.is_labelable(n))
    }

    fn is_labelable(&self, node: NodeId) -> bool {
        match self.tag_name(node) {
            Some("input") => !self
                .attribute(node, "type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
            Some(tag) => LABELABLE.contains(&tag),
            None => false,
        }
    }

    fn first_legend(&self, fieldset: NodeId) -> Option<NodeId> {
        self.children(fieldset)
            .iter()
            .copied()
            .find(|&c| self.tag_name(c) == Some("legend"))
    }

    // --- internals ---

    /// Inclusive descendants of `id` in tree order.
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn free_subtree(&mut self, id: NodeId) {
        for n in self.descendants(id) {
            self.nodes[n.idx()] = None;
            self.free_list.push(n.idx());
        }
        log::trace!("removed subtree rooted at {id:?}");
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    /// Access a node; panics if `id` is stale. Callers check liveness first.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}

fn contains_ignore_case(set: &[&str], value: &str) -> bool {
    set.iter().any(|s| s.eq_ignore_ascii_case(value))
}
