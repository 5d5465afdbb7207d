//! DOM Tree (arena-based allocation)
//!
//! Every node created through a tree lives in that tree's arena until the
//! tree is dropped; detaching only clears the parent link.

use std::cmp::Ordering;

use crate::{
    Ancestors, AttributeMap, Descendants, DomError, DomResult, ElementData, Node, NodeData,
    NodeId, NodeKind, TokenList,
};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only its document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Look up a node or fail with `NotFound`
    pub(crate) fn check(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag_name)))
    }

    /// Create a detached element with attributes in the given order
    pub fn create_element_with_attributes<'a, I>(&mut self, tag_name: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut data = ElementData::new(tag_name);
        for (name, value) in attrs {
            data.attrs.set_attribute(name, value);
        }
        self.push(NodeData::Element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_string()))
    }

    /// Create an empty document fragment
    pub fn create_document_fragment(&mut self) -> NodeId {
        self.push(NodeData::DocumentFragment)
    }

    // ------------------------------------------------------------------
    // Node inspection
    // ------------------------------------------------------------------

    /// Node kind
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    /// Check if a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Element data, if the node is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag_name)
    }

    /// DOM `nodeName`
    pub fn node_name(&self, id: NodeId) -> String {
        match self.get(id).map(Node::data) {
            Some(NodeData::Element(e)) => e.tag_name.to_ascii_uppercase(),
            Some(NodeData::Text(_)) => "#text".to_string(),
            Some(NodeData::Comment(_)) => "#comment".to_string(),
            Some(NodeData::Document) => "#document".to_string(),
            Some(NodeData::DocumentFragment) => "#document-fragment".to_string(),
            None => String::new(),
        }
    }

    /// Character data of text and comment nodes
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(Node::data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => Some(t),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Parent, if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Child nodes (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], Node::children)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Position of a node in its parent's child list (linear in the sibling count)
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Sibling links, read from the parent's child list
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.is_element(c))
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|&c| self.is_element(c))
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).count()
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.is_element(c))
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Proper descendants in pre-order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id, false)
    }

    /// The node itself followed by its descendants in pre-order
    pub fn inclusive_descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id, true)
    }

    /// Proper ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    /// Whether `other` is `node` or one of its descendants
    pub fn contains(&self, node: NodeId, other: NodeId) -> bool {
        node == other || self.ancestors(other).any(|a| a == node)
    }

    /// Topmost ancestor (the node itself when detached)
    pub fn root_node(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Pre-order comparison of two nodes.
    ///
    /// Returns `None` when the nodes do not share a root.
    pub fn document_order(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        if a == b {
            return Some(Ordering::Equal);
        }
        let path_a = self.position_path(a);
        let path_b = self.position_path(b);
        if path_a.first() != path_b.first() {
            return None;
        }
        // An ancestor is a prefix of its descendant's path and sorts first.
        Some(path_a.cmp(&path_b))
    }

    /// Root id followed by the child index at each level down to `id`.
    ///
    /// Comparing paths orders nodes in pre-order, with detached subtrees
    /// ordered by the arena index of their root.
    pub fn position_path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_in_parent(current).unwrap_or(0));
            current = parent;
        }
        path.push(current.index());
        path.reverse();
        path
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Attribute store of an element
    pub fn attributes(&self, id: NodeId) -> Option<&AttributeMap> {
        self.element(id).map(ElementData::attributes)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attributes(id).is_some_and(|a| a.has_attribute(name))
    }

    /// Set an attribute; fails for non-elements
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.attrs.set_attribute(name, value);
        Ok(())
    }

    /// Remove an attribute, returning its old value (no-op for non-elements)
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)
            .ok()?
            .attrs
            .remove_named_item(name)
            .map(|a| a.value)
    }

    pub fn toggle_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        force: Option<bool>,
    ) -> DomResult<bool> {
        Ok(self.element_mut(id)?.attrs.toggle_attribute(name, force))
    }

    pub fn attribute_names(&self, id: NodeId) -> Vec<&str> {
        self.attributes(id).map(AttributeMap::names).unwrap_or_default()
    }

    /// `id` attribute
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get_attribute(id, "id")
    }

    /// `class` attribute
    pub fn class_name(&self, id: NodeId) -> Option<&str> {
        self.get_attribute(id, "class")
    }

    /// classList view of an element
    pub fn class_list(&self, id: NodeId) -> TokenList {
        TokenList::new(id, "class")
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes.
    ///
    /// `None` for the document node, as in the DOM.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match self.get(id)?.data() {
            NodeData::Document => None,
            NodeData::Text(t) | NodeData::Comment(t) => Some(t.clone()),
            NodeData::Element(_) | NodeData::DocumentFragment => {
                let mut out = String::new();
                for node in self.descendants(id) {
                    if let Some(text) = self.get(node).and_then(Node::as_text) {
                        out.push_str(text);
                    }
                }
                Some(out)
            }
        }
    }
}
