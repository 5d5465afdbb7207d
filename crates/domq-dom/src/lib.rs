//! domq DOM - Document Object Model
//!
//! Arena-based DOM tree for server-side HTML processing.
//! Nodes are addressed by [`NodeId`]; parent and sibling links are derived
//! from each node's owning child list, so they can never desynchronize.

mod attributes;
mod classlist;
mod collections;
mod document;
mod node;
mod operations;
mod traversal;
mod tree;

pub use attributes::{Attr, AttributeMap};
pub use classlist::{split_tokens, TokenList, TokenSet};
pub use collections::{CollectionFilter, HtmlCollection, NodeList};
pub use document::Document;
pub use node::{ElementData, Node, NodeData, NodeKind};
pub use operations::{DomError, DomResult, NodeOperations};
pub use traversal::{
    AcceptAllFilter, Ancestors, Descendants, FilterResult, NodeFilter, TreeWalker, WhatToShow,
};
pub use tree::DomTree;

/// Node identifier (index into the owning tree's arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
