//! DOM Node
//!
//! A node owns its child list and records a single parent link.
//! Sibling links are not stored: they are read from the parent's child list.

use crate::{AttributeMap, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Owning parent (None if detached or the document itself)
    pub(crate) parent: Option<NodeId>,
    /// Owned children, in document order
    pub(crate) children: Vec<NodeId>,
    /// Node-specific data
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// Node kind discriminant
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document => NodeKind::Document,
            NodeData::DocumentFragment => NodeKind::DocumentFragment,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }

    /// Parent node, if attached
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in order
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Node-specific data
    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this node kind may own children
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document | NodeData::DocumentFragment | NodeData::Element(_)
        )
    }
}

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    DocumentFragment,
    Element,
    Text,
    Comment,
}

impl NodeKind {
    /// DOM `nodeType` constant
    pub fn node_type(self) -> u16 {
        match self {
            NodeKind::Element => 1,
            NodeKind::Text => 3,
            NodeKind::Comment => 8,
            NodeKind::Document => 9,
            NodeKind::DocumentFragment => 11,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Lightweight container whose children move on insertion
    DocumentFragment,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name as created (matching is case-insensitive)
    pub(crate) tag_name: String,
    /// Attributes in insertion order
    pub(crate) attrs: AttributeMap,
}

impl ElementData {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributeMap::new(),
        }
    }

    /// Tag name
    #[inline]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Attribute store
    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attrs
    }

    /// Mutable attribute store
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attrs
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attribute(name)
    }

    /// `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attrs.get_attribute("id")
    }

    /// Compare tag names ASCII case-insensitively
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        assert_eq!(Node::new(NodeData::Document).kind(), NodeKind::Document);
        assert_eq!(Node::new(NodeData::Text("x".into())).kind(), NodeKind::Text);
        assert_eq!(NodeKind::Element.node_type(), 1);
        assert_eq!(NodeKind::DocumentFragment.node_type(), 11);
    }

    #[test]
    fn test_element_data() {
        let mut elem = ElementData::new("DIV");
        elem.attributes_mut().set_attribute("id", "main");

        assert!(elem.has_tag("div"));
        assert_eq!(elem.id(), Some("main"));
        assert_eq!(elem.get_attr("class"), None);
    }

    #[test]
    fn test_text_cannot_have_children() {
        assert!(!Node::new(NodeData::Comment(String::new())).can_have_children());
        assert!(Node::new(NodeData::DocumentFragment).can_have_children());
    }
}
