//! Document - High-level document API

use crate::{DomResult, DomTree, HtmlCollection, NodeId, NodeOperations};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
}

impl Document {
    /// Create a document with an `html > head + body` skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Fresh childless elements under a document node: nothing to validate.
        let root = doc.tree.root();
        doc.tree.insert_unchecked(root, html, None);
        doc.tree.insert_unchecked(html, head, None);
        doc.tree.insert_unchecked(html, body, None);
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self::from_tree(DomTree::new(), url)
    }

    /// Wrap an existing tree
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        Self {
            tree,
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// First element child of the document
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.first_element_child(self.root())
    }

    /// `<head>` child of the document element
    pub fn head(&self) -> Option<NodeId> {
        self.html_child("head")
    }

    /// `<body>` child of the document element
    pub fn body(&self) -> Option<NodeId> {
        self.html_child("body")
    }

    fn html_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree
            .element_children(html)
            .find(|&c| self.tree.element(c).is_some_and(|e| e.has_tag(tag)))
    }

    /// Text of the first `<title>`, whitespace collapsed
    pub fn title(&self) -> String {
        let Some(title) = self
            .tree
            .descendants(self.root())
            .find(|&n| self.tree.element(n).is_some_and(|e| e.has_tag("title")))
        else {
            return String::new();
        };
        let text = self.tree.text_content(title).unwrap_or_default();
        text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Get element by ID (first in document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(self.root())
            .find(|&n| self.tree.element_id(n) == Some(id))
    }

    /// Live collection of descendants with this tag
    pub fn get_elements_by_tag_name(&self, tag: &str) -> HtmlCollection {
        HtmlCollection::by_tag_name(self.root(), tag)
    }

    /// Live collection of descendants carrying all given classes
    pub fn get_elements_by_class_name(&self, classes: &str) -> HtmlCollection {
        HtmlCollection::by_class_names(self.root(), classes)
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(tag_name)
    }

    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.tree.create_text(data)
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.tree.create_comment(data)
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.tree.create_document_fragment()
    }

    /// Append to `<body>`, failing if the document has none
    pub fn append_to_body(&mut self, node: NodeId) -> DomResult<NodeId> {
        let body = self
            .body()
            .ok_or(crate::DomError::HierarchyRequest("document has no body"))?;
        self.tree.append_child(body, node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree().tag_name(html), Some("html"));
        assert_eq!(doc.tree().tag_name(doc.head().unwrap()), Some("head"));
        assert_eq!(doc.tree().tag_name(doc.body().unwrap()), Some("body"));
        assert_eq!(doc.url(), "https://example.com/");
    }

    #[test]
    fn test_skeleton_links() {
        let doc = Document::new("about:blank");
        let tree = doc.tree();
        let html = doc.document_element().unwrap();
        let (head, body) = (doc.head().unwrap(), doc.body().unwrap());
        assert_eq!(tree.parent(html), Some(doc.root()));
        assert_eq!(tree.children(html), &[head, body]);
        assert_eq!(tree.parent(body), Some(html));
        assert_eq!(tree.next_sibling(head), Some(body));
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::empty("about:blank");
        assert_eq!(doc.document_element(), None);
        assert_eq!(doc.body(), None);
        assert_eq!(doc.title(), "");
        assert_eq!(doc.get_element_by_id("x"), None);
    }

    #[test]
    fn test_title() {
        let mut doc = Document::default();
        let head = doc.head().unwrap();
        let title = doc.create_element("title");
        let text = doc.create_text_node("  Hello \n  World ");
        doc.tree_mut().append_child(head, title).unwrap();
        doc.tree_mut().append_child(title, text).unwrap();
        assert_eq!(doc.title(), "Hello World");
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let first = doc.tree_mut().create_element_with_attributes("p", [("id", "dup")]);
        let second = doc.tree_mut().create_element_with_attributes("p", [("id", "dup")]);
        doc.append_to_body(first).unwrap();
        doc.append_to_body(second).unwrap();

        assert_eq!(doc.get_element_by_id("dup"), Some(first));
        doc.tree_mut().remove_attribute(first, "id");
        assert_eq!(doc.get_element_by_id("dup"), Some(second));
    }

    #[test]
    fn test_live_tag_collection() {
        let mut doc = Document::default();
        let paragraphs = doc.get_elements_by_tag_name("p");
        assert_eq!(paragraphs.length(doc.tree()), 0);

        let p = doc.create_element("p");
        doc.append_to_body(p).unwrap();
        assert_eq!(paragraphs.item(doc.tree(), 0), Some(p));
    }
}
