//! Tree traversal
//!
//! Pre-order and ancestor iterators plus the DOM TreeWalker.
//!
//! All traversal is iterative: document depth is input controlled, so no
//! walk here recurses.

use crate::{DomTree, NodeId, NodeKind};

/// Pre-order walk over a subtree using an explicit stack
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
    /// Last yielded node whose children have not been scheduled yet
    pending: Option<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(tree: &'a DomTree, start: NodeId, inclusive: bool) -> Self {
        if inclusive {
            Self {
                tree,
                stack: vec![start],
                pending: None,
            }
        } else {
            Self {
                tree,
                stack: Vec::new(),
                pending: Some(start),
            }
        }
    }

    /// Do not descend into the children of the node returned last
    pub fn skip_children(&mut self) {
        self.pending = None;
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(parent) = self.pending.take() {
            self.stack
                .extend(self.tree.children(parent).iter().rev().copied());
        }
        let node = self.stack.pop()?;
        self.pending = Some(node);
        Some(node)
    }
}

/// Proper ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a DomTree, start: NodeId) -> Self {
        Self {
            tree,
            current: tree.parent(start),
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.current?;
        self.current = self.tree.parent(node);
        Some(node)
    }
}

/// What types of nodes to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFF_FFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);
    pub const DOCUMENT: WhatToShow = WhatToShow(0x100);
    pub const DOCUMENT_FRAGMENT: WhatToShow = WhatToShow(0x400);

    /// Check if a node kind is shown
    pub fn includes(self, kind: NodeKind) -> bool {
        let flag = match kind {
            NodeKind::Element => Self::ELEMENT.0,
            NodeKind::Text => Self::TEXT.0,
            NodeKind::Comment => Self::COMMENT.0,
            NodeKind::Document => Self::DOCUMENT.0,
            NodeKind::DocumentFragment => Self::DOCUMENT_FRAGMENT.0,
        };
        (self.0 & flag) != 0
    }

    /// Union of two filters
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }
}

impl Default for WhatToShow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Accept the node
    Accept,
    /// Reject the node and its descendants
    Reject,
    /// Skip this node but process its children
    Skip,
}

/// Node filter trait for custom filtering
pub trait NodeFilter {
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> FilterResult;
}

impl<F> NodeFilter for F
where
    F: Fn(&DomTree, NodeId) -> FilterResult,
{
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> FilterResult {
        self(tree, node)
    }
}

/// Filter that accepts all nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl NodeFilter for AcceptAllFilter {
    fn accept_node(&self, _tree: &DomTree, _node: NodeId) -> FilterResult {
        FilterResult::Accept
    }
}

/// TreeWalker for navigating a subtree.
///
/// The walker holds no borrow of the tree; each step takes the tree, so the
/// tree may be mutated between steps.
pub struct TreeWalker {
    root: NodeId,
    what_to_show: WhatToShow,
    current_node: NodeId,
    filter: Option<Box<dyn NodeFilter>>,
}

impl TreeWalker {
    pub fn new(root: NodeId, what_to_show: WhatToShow) -> Self {
        Self {
            root,
            what_to_show,
            current_node: root,
            filter: None,
        }
    }

    pub fn with_filter(
        root: NodeId,
        what_to_show: WhatToShow,
        filter: Box<dyn NodeFilter>,
    ) -> Self {
        Self {
            root,
            what_to_show,
            current_node: root,
            filter: Some(filter),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    pub fn set_current_node(&mut self, node: NodeId) {
        self.current_node = node;
    }

    fn filter(&self, tree: &DomTree, node: NodeId) -> FilterResult {
        let Some(kind) = tree.kind(node) else {
            return FilterResult::Reject;
        };
        if !self.what_to_show.includes(kind) {
            return FilterResult::Skip;
        }
        match &self.filter {
            Some(filter) => filter.accept_node(tree, node),
            None => FilterResult::Accept,
        }
    }

    fn accept(&mut self, node: NodeId) -> Option<NodeId> {
        self.current_node = node;
        Some(node)
    }

    pub fn parent_node(&mut self, tree: &DomTree) -> Option<NodeId> {
        let mut node = self.current_node;
        while node != self.root {
            node = tree.parent(node)?;
            if self.filter(tree, node) == FilterResult::Accept {
                return self.accept(node);
            }
        }
        None
    }

    pub fn first_child(&mut self, tree: &DomTree) -> Option<NodeId> {
        self.traverse_children(tree, true)
    }

    pub fn last_child(&mut self, tree: &DomTree) -> Option<NodeId> {
        self.traverse_children(tree, false)
    }

    pub fn next_sibling(&mut self, tree: &DomTree) -> Option<NodeId> {
        self.traverse_siblings(tree, true)
    }

    pub fn previous_sibling(&mut self, tree: &DomTree) -> Option<NodeId> {
        self.traverse_siblings(tree, false)
    }

    fn traverse_children(&mut self, tree: &DomTree, first: bool) -> Option<NodeId> {
        let edge_child = |n: NodeId| {
            if first {
                tree.first_child(n)
            } else {
                tree.last_child(n)
            }
        };
        let sibling = |n: NodeId| {
            if first {
                tree.next_sibling(n)
            } else {
                tree.previous_sibling(n)
            }
        };

        let mut node = edge_child(self.current_node)?;
        loop {
            match self.filter(tree, node) {
                FilterResult::Accept => return self.accept(node),
                FilterResult::Skip => {
                    if let Some(child) = edge_child(node) {
                        node = child;
                        continue;
                    }
                }
                FilterResult::Reject => {}
            }
            loop {
                if let Some(next) = sibling(node) {
                    node = next;
                    break;
                }
                let parent = tree.parent(node)?;
                if parent == self.root || parent == self.current_node {
                    return None;
                }
                node = parent;
            }
        }
    }

    fn traverse_siblings(&mut self, tree: &DomTree, next: bool) -> Option<NodeId> {
        let sibling = |n: NodeId| {
            if next {
                tree.next_sibling(n)
            } else {
                tree.previous_sibling(n)
            }
        };
        let edge_child = |n: NodeId| {
            if next {
                tree.first_child(n)
            } else {
                tree.last_child(n)
            }
        };

        let mut node = self.current_node;
        if node == self.root {
            return None;
        }
        loop {
            let mut candidate = sibling(node);
            while let Some(s) = candidate {
                node = s;
                let result = self.filter(tree, node);
                if result == FilterResult::Accept {
                    return self.accept(node);
                }
                candidate = edge_child(node);
                if result == FilterResult::Reject || candidate.is_none() {
                    candidate = sibling(node);
                }
            }
            node = tree.parent(node)?;
            if node == self.root || self.filter(tree, node) == FilterResult::Accept {
                return None;
            }
        }
    }

    /// Next node in pre-order within the root
    pub fn next_node(&mut self, tree: &DomTree) -> Option<NodeId> {
        let mut node = self.current_node;
        let mut result = FilterResult::Accept;
        loop {
            while result != FilterResult::Reject {
                let Some(child) = tree.first_child(node) else {
                    break;
                };
                node = child;
                result = self.filter(tree, node);
                if result == FilterResult::Accept {
                    return self.accept(node);
                }
            }

            let mut temporary = Some(node);
            let mut found = None;
            while let Some(t) = temporary {
                if t == self.root {
                    return None;
                }
                if let Some(s) = tree.next_sibling(t) {
                    found = Some(s);
                    break;
                }
                temporary = tree.parent(t);
            }
            node = found?;
            result = self.filter(tree, node);
            if result == FilterResult::Accept {
                return self.accept(node);
            }
        }
    }

    /// Previous node in pre-order within the root
    pub fn previous_node(&mut self, tree: &DomTree) -> Option<NodeId> {
        let mut node = self.current_node;
        while node != self.root {
            let mut sibling = tree.previous_sibling(node);
            while let Some(s) = sibling {
                node = s;
                let mut result = self.filter(tree, node);
                while result != FilterResult::Reject {
                    let Some(last) = tree.last_child(node) else {
                        break;
                    };
                    node = last;
                    result = self.filter(tree, node);
                }
                if result == FilterResult::Accept {
                    return self.accept(node);
                }
                sibling = tree.previous_sibling(node);
            }
            node = tree.parent(node)?;
            if self.filter(tree, node) == FilterResult::Accept {
                return self.accept(node);
            }
        }
        None
    }
}
