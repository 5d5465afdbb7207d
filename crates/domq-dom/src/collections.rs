//! Node collections
//!
//! [`NodeList`] is a snapshot taken at call time. [`HtmlCollection`] is live:
//! it keeps only a root and a filter and recomputes its members from the tree
//! it is handed on every call.

use std::ops::Index;

use crate::{split_tokens, DomTree, NodeId};

/// Static node list (query results)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    nodes: Vec<NodeId>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.item(0)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }
}

impl Index<usize> for NodeList {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.nodes[index]
    }
}

impl IntoIterator for NodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl FromIterator<NodeId> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// Membership rule of a live collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionFilter {
    /// Element children of the root
    Children,
    /// Descendant elements with this tag (`*` for all), ASCII case-insensitive
    TagName(String),
    /// Descendant elements carrying every listed class
    ClassNames(Vec<String>),
}

impl CollectionFilter {
    fn accepts(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.element(node) else {
            return false;
        };
        match self {
            Self::Children => true,
            Self::TagName(tag) => tag == "*" || element.has_tag(tag),
            // An empty class list matches nothing.
            Self::ClassNames(classes) => {
                !classes.is_empty()
                    && element.get_attr("class").is_some_and(|value| {
                        classes
                            .iter()
                            .all(|wanted| split_tokens(value).any(|c| c == wanted))
                    })
            }
        }
    }
}

/// Live element collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlCollection {
    root: NodeId,
    filter: CollectionFilter,
}

impl HtmlCollection {
    /// `element.children`
    pub fn children(root: NodeId) -> Self {
        Self {
            root,
            filter: CollectionFilter::Children,
        }
    }

    /// `getElementsByTagName`
    pub fn by_tag_name(root: NodeId, tag: &str) -> Self {
        Self {
            root,
            filter: CollectionFilter::TagName(tag.to_string()),
        }
    }

    /// `getElementsByClassName`, classes given space-separated
    pub fn by_class_names(root: NodeId, classes: &str) -> Self {
        Self {
            root,
            filter: CollectionFilter::ClassNames(
                split_tokens(classes).map(str::to_string).collect(),
            ),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn filter(&self) -> &CollectionFilter {
        &self.filter
    }

    /// Current members in document order
    pub fn iter<'t>(&'t self, tree: &'t DomTree) -> Box<dyn Iterator<Item = NodeId> + 't> {
        match &self.filter {
            CollectionFilter::Children => Box::new(tree.element_children(self.root)),
            filter => Box::new(
                tree.descendants(self.root)
                    .filter(move |&n| filter.accepts(tree, n)),
            ),
        }
    }

    pub fn length(&self, tree: &DomTree) -> usize {
        self.iter(tree).count()
    }

    pub fn item(&self, tree: &DomTree, index: usize) -> Option<NodeId> {
        self.iter(tree).nth(index)
    }

    /// First member whose `id` equals `name`, else the first whose `name` does
    pub fn named_item(&self, tree: &DomTree, name: &str) -> Option<NodeId> {
        if name.is_empty() {
            return None;
        }
        self.iter(tree)
            .find(|&n| tree.element_id(n) == Some(name))
            .or_else(|| {
                self.iter(tree)
                    .find(|&n| tree.get_attribute(n, "name") == Some(name))
            })
    }

    /// Freeze the current members
    pub fn to_node_list(&self, tree: &DomTree) -> NodeList {
        self.iter(tree).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeOperations;

    #[test]
    fn test_node_list() {
        let list = NodeList::from_vec(vec![NodeId(1), NodeId(2), NodeId(3)]);

        assert_eq!(list.length(), 3);
        assert_eq!(list.item(0), Some(NodeId(1)));
        assert_eq!(list[2], NodeId(3));
        assert_eq!(list.item(3), None);
        assert!(list.contains(NodeId(2)));
    }

    #[test]
    fn test_children_collection_is_live() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let text = tree.create_text(" ");
        let li = tree.create_element("li");
        tree.append_child(ul, text).unwrap();
        tree.append_child(ul, li).unwrap();

        let children = HtmlCollection::children(ul);
        let snapshot = children.to_node_list(&tree);
        assert_eq!(children.length(&tree), 1);

        let li2 = tree.create_element("li");
        tree.append_child(ul, li2).unwrap();
        assert_eq!(children.length(&tree), 2);
        assert_eq!(children.item(&tree, 1), Some(li2));
        assert_eq!(snapshot.length(), 1);
    }

    #[test]
    fn test_by_tag_name() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p = tree.create_element("P");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, span).unwrap();

        let root = tree.root();
        assert_eq!(HtmlCollection::by_tag_name(root, "p").to_node_list(&tree).to_vec(), vec![p]);
        assert_eq!(HtmlCollection::by_tag_name(root, "*").length(&tree), 3);
        // The root itself is never a member.
        assert_eq!(HtmlCollection::by_tag_name(div, "div").length(&tree), 0);
    }

    #[test]
    fn test_by_class_names() {
        let mut tree = DomTree::new();
        let a = tree.create_element_with_attributes("a", [("class", "x y")]);
        let b = tree.create_element_with_attributes("b", [("class", "y")]);
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(tree.root(), b).unwrap();

        let root = tree.root();
        let both = HtmlCollection::by_class_names(root, "  y  x ");
        assert_eq!(both.to_node_list(&tree).to_vec(), vec![a]);
        assert_eq!(HtmlCollection::by_class_names(root, "y").length(&tree), 2);
        assert_eq!(HtmlCollection::by_class_names(root, " ").length(&tree), 0);

        tree.set_attribute(b, "class", "x y").unwrap();
        assert_eq!(both.length(&tree), 2);
    }

    #[test]
    fn test_named_item() {
        let mut tree = DomTree::new();
        let form = tree.create_element("form");
        let by_name = tree.create_element_with_attributes("input", [("name", "q")]);
        let by_id = tree.create_element_with_attributes("input", [("id", "q")]);
        tree.append_child(form, by_name).unwrap();
        tree.append_child(form, by_id).unwrap();

        let inputs = HtmlCollection::children(form);
        assert_eq!(inputs.named_item(&tree, "q"), Some(by_id));
        assert_eq!(inputs.named_item(&tree, "nope"), None);
        assert_eq!(inputs.named_item(&tree, ""), None);
    }
}
