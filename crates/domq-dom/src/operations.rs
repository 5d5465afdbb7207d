//! DOM Node Operations
//!
//! Core node manipulation: appendChild, removeChild, insertBefore,
//! replaceChild, cloneNode, normalize.
//!
//! Every operation validates its arguments before touching the tree, so a
//! failed call leaves the tree exactly as it was.

use crate::{DomTree, NodeData, NodeId, NodeKind};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not belong to this tree
    #[error("node {0} does not exist in this tree")]
    NotFound(NodeId),

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Insertion would break the tree shape
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    /// Element-only operation on another node kind
    #[error("node {0} is not an element")]
    InvalidNodeType(NodeId),

    /// Empty token passed to a token list
    #[error("the token provided must not be empty")]
    Syntax,

    /// Token containing whitespace passed to a token list
    #[error("the token provided ({0:?}) contains whitespace")]
    InvalidCharacter(String),
}

impl DomError {
    /// DOMException name for this error
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::NotAChild { .. } => "NotFoundError",
            Self::HierarchyRequest(_) => "HierarchyRequestError",
            Self::InvalidNodeType(_) => "InvalidNodeTypeError",
            Self::Syntax => "SyntaxError",
            Self::InvalidCharacter(_) => "InvalidCharacterError",
        }
    }
}

/// Node operations trait
pub trait NodeOperations {
    /// Append a child node, moving it from any previous parent
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Remove a child node
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Insert before a reference node (`None` appends)
    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId>;

    /// Replace a child with another node, returning the old child
    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId>;

    /// Clone a node; `deep` also clones the subtree
    fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId>;

    /// Detach a node from its parent, if any
    fn detach(&mut self, node: NodeId) -> DomResult<()>;

    /// Normalize text nodes (merge adjacent, drop empty)
    fn normalize(&mut self, node: NodeId) -> DomResult<()>;
}

impl DomTree {
    /// Pre-insertion validity checks
    fn ensure_pre_insert(
        &self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<()> {
        let parent_node = self.check(parent)?;
        let inserted = self.check(node)?;

        if !parent_node.can_have_children() {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }
        if inserted.kind() == NodeKind::Document {
            return Err(DomError::HierarchyRequest("a document cannot be inserted"));
        }
        // A childless node can only contain itself.
        let could_contain = node == parent || !inserted.children().is_empty();
        if could_contain && self.contains(node, parent) {
            return Err(DomError::HierarchyRequest(
                "a node cannot be inserted into itself or its descendants",
            ));
        }
        if let Some(child) = child {
            self.check(child)?;
            if self.parent(child) != Some(parent) {
                return Err(DomError::NotAChild { parent, child });
            }
        }
        Ok(())
    }

    /// Unlink a node from its parent's child list
    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = None;
        }
    }

    /// Insert after validation; fragments contribute their children
    pub(crate) fn insert_unchecked(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let moved: Vec<NodeId> = if self.kind(node) == Some(NodeKind::DocumentFragment) {
            let children = self
                .get_mut(node)
                .map(|f| std::mem::take(&mut f.children))
                .unwrap_or_default();
            for &c in &children {
                if let Some(n) = self.get_mut(c) {
                    n.parent = None;
                }
            }
            children
        } else {
            self.unlink(node);
            vec![node]
        };

        let index = reference
            .and_then(|r| self.children(parent).iter().position(|&c| c == r))
            .unwrap_or_else(|| self.children(parent).len());

        for &c in &moved {
            if let Some(n) = self.get_mut(c) {
                n.parent = Some(parent);
            }
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.splice(index..index, moved);
        }
    }

    /// Replace all children with a single text node (none for `""`).
    ///
    /// Text and comment nodes have their data replaced; the document is left
    /// untouched.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        let kind = self.check(node)?.kind();
        match kind {
            NodeKind::Document => Ok(()),
            NodeKind::Text | NodeKind::Comment => self.set_node_value(node, text),
            NodeKind::Element | NodeKind::DocumentFragment => {
                let children = self
                    .get_mut(node)
                    .map(|n| std::mem::take(&mut n.children))
                    .unwrap_or_default();
                for c in children {
                    if let Some(n) = self.get_mut(c) {
                        n.parent = None;
                    }
                }
                if !text.is_empty() {
                    let t = self.create_text(text);
                    self.insert_unchecked(node, t, None);
                }
                Ok(())
            }
        }
    }

    /// Replace the data of a text or comment node (no-op for other kinds)
    pub fn set_node_value(&mut self, node: NodeId, value: &str) -> DomResult<()> {
        let n = self.get_mut(node).ok_or(DomError::NotFound(node))?;
        if let NodeData::Text(t) | NodeData::Comment(t) = &mut n.data {
            t.clear();
            t.push_str(value);
        }
        Ok(())
    }

    /// Append a string of text to an existing text node's data
    fn append_text_data(&mut self, node: NodeId, extra: &str) {
        if let Some(NodeData::Text(t)) = self.get_mut(node).map(|n| &mut n.data) {
            t.push_str(extra);
        }
    }
}

impl NodeOperations for DomTree {
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.ensure_pre_insert(parent, child, None)?;
        self.insert_unchecked(parent, child, None);
        Ok(child)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.unlink(child);
        Ok(child)
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insert(parent, new_child, ref_child)?;
        // Inserting a node before itself means "before its next sibling".
        let reference = match ref_child {
            Some(r) if r == new_child => self.next_sibling(new_child),
            other => other,
        };
        self.insert_unchecked(parent, new_child, reference);
        Ok(new_child)
    }

    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insert(parent, new_child, Some(old_child))?;
        if new_child == old_child {
            return Ok(old_child);
        }
        let mut reference = self.next_sibling(old_child);
        if reference == Some(new_child) {
            reference = self.next_sibling(new_child);
        }
        self.unlink(old_child);
        self.insert_unchecked(parent, new_child, reference);
        Ok(old_child)
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        let data = self.check(node)?.data.clone();
        let copy = self.push(data);
        if !deep {
            return Ok(copy);
        }

        let mut stack = vec![(node, copy)];
        while let Some((source, target)) = stack.pop() {
            let children = self.children(source).to_vec();
            for child in children {
                let data = match self.get(child) {
                    Some(n) => n.data.clone(),
                    None => continue,
                };
                let child_copy = self.push(data);
                if let Some(n) = self.get_mut(child_copy) {
                    n.parent = Some(target);
                }
                if let Some(t) = self.get_mut(target) {
                    t.children.push(child_copy);
                }
                stack.push((child, child_copy));
            }
        }
        tracing::trace!("Deep-cloned {} into {}", node, copy);
        Ok(copy)
    }

    fn detach(&mut self, node: NodeId) -> DomResult<()> {
        self.check(node)?;
        self.unlink(node);
        Ok(())
    }

    fn normalize(&mut self, node: NodeId) -> DomResult<()> {
        self.check(node)?;
        let parents: Vec<NodeId> = self
            .inclusive_descendants(node)
            .filter(|&n| self.has_child_nodes(n))
            .collect();

        let mut dropped = 0usize;
        for parent in parents {
            let children = self.children(parent).to_vec();
            let mut last_text: Option<NodeId> = None;
            for child in children {
                let data = match self.get(child).map(|n| &n.data) {
                    Some(NodeData::Text(t)) => t.clone(),
                    _ => {
                        last_text = None;
                        continue;
                    }
                };
                if data.is_empty() {
                    self.unlink(child);
                    dropped += 1;
                } else if let Some(target) = last_text {
                    self.append_text_data(target, &data);
                    self.unlink(child);
                    dropped += 1;
                } else {
                    last_text = Some(child);
                }
            }
        }
        tracing::trace!("Normalized {}: {} text nodes merged or dropped", node, dropped);
        Ok(())
    }
}
