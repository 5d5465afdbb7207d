//! Edge case and stress tests for domq-dom
//!
//! Deep trees, stale ids, and rejected mutations that must leave no trace.

use std::cmp::Ordering;

use domq_dom::{DomError, DomTree, NodeId, NodeOperations, TokenList};

// ============================================================================
// DEEP TREES
// ============================================================================

fn deep_chain(depth: usize) -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let top = tree.create_element("div");
    tree.append_child(tree.root(), top).unwrap();
    let mut current = top;
    for _ in 0..depth {
        let child = tree.create_element("div");
        tree.append_child(current, child).unwrap();
        current = child;
    }
    let leaf = tree.create_text("bottom");
    tree.append_child(current, leaf).unwrap();
    (tree, top, leaf)
}

#[test]
fn test_deep_tree_traversal() {
    let (tree, top, leaf) = deep_chain(100_000);
    assert_eq!(tree.descendants(top).count(), 100_001);
    assert_eq!(tree.text_content(top).as_deref(), Some("bottom"));
    assert!(tree.contains(top, leaf));
    assert_eq!(tree.document_order(top, leaf), Some(Ordering::Less));
}

#[test]
fn test_deep_tree_clone() {
    let (mut tree, top, _) = deep_chain(50_000);
    let copy = tree.clone_node(top, true).unwrap();
    assert_eq!(tree.descendants(copy).count(), 50_001);
    assert_eq!(tree.text_content(copy).as_deref(), Some("bottom"));
}

#[test]
fn test_deep_tree_normalize() {
    let (mut tree, top, leaf) = deep_chain(50_000);
    let parent = tree.parent(leaf).unwrap();
    let extra = tree.create_text("!");
    tree.append_child(parent, extra).unwrap();

    tree.normalize(top).unwrap();
    assert_eq!(tree.children(parent), &[leaf]);
    assert_eq!(tree.node_value(leaf), Some("bottom!"));
}

// ============================================================================
// REJECTED MUTATIONS
// ============================================================================

#[test]
fn test_unknown_node_id() {
    let mut tree = DomTree::new();
    let other = {
        let mut big = DomTree::new();
        for _ in 0..10 {
            big.create_element("x");
        }
        big.create_element("y")
    };

    assert_eq!(tree.append_child(tree.root(), other), Err(DomError::NotFound(other)));
    assert_eq!(tree.clone_node(other, true), Err(DomError::NotFound(other)));
    assert!(tree.children(other).is_empty());
    assert_eq!(tree.text_content(other), None);
}

#[test]
fn test_insert_document_rejected() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let err = tree.append_child(div, tree.root()).unwrap_err();
    assert_eq!(err.name(), "HierarchyRequestError");
}

#[test]
fn test_insert_into_self_rejected() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert!(matches!(
        tree.append_child(div, div),
        Err(DomError::HierarchyRequest(_))
    ));
}

#[test]
fn test_comment_cannot_have_children() {
    let mut tree = DomTree::new();
    let comment = tree.create_comment("c");
    let text = tree.create_text("t");
    assert!(tree.append_child(comment, text).is_err());
    assert_eq!(tree.parent(text), None);
}

#[test]
fn test_remove_detached_node() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    assert_eq!(
        tree.remove_child(div, span),
        Err(DomError::NotAChild { parent: div, child: span })
    );
    tree.detach(span).unwrap();
    assert_eq!(tree.parent(span), None);
}

// ============================================================================
// TOKEN LISTS
// ============================================================================

#[test]
fn test_token_whitespace_variants() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attributes("div", [("class", "\t a \n b\r\n")]);
    let list = tree.class_list(el);
    assert_eq!(list.tokens(&tree).value(), "a b");

    for bad in ["a b", "a\tb", "a\nb", "\u{3000}x"] {
        let err = list.add(&mut tree, &[bad]).unwrap_err();
        assert_eq!(err.name(), "InvalidCharacterError", "token {:?}", bad);
    }
    assert_eq!(list.toggle(&mut tree, "", None), Err(DomError::Syntax));
    assert_eq!(list.replace(&mut tree, "a", ""), Err(DomError::Syntax));
    assert_eq!(tree.class_name(el), Some("\t a \n b\r\n"));
}

#[test]
fn test_token_list_unicode() {
    let mut tree = DomTree::new();
    let el = tree.create_element("div");
    let list = TokenList::new(el, "class");
    list.add(&mut tree, &["日本", "🚀", "Ñoño"]).unwrap();
    assert_eq!(tree.class_name(el), Some("日本 🚀 Ñoño"));
    assert!(list.contains(&tree, "🚀"));
}

#[test]
fn test_token_list_on_detached_then_attached() {
    let mut tree = DomTree::new();
    let el = tree.create_element("div");
    let list = tree.class_list(el);
    list.add(&mut tree, &["x"]).unwrap();
    tree.append_child(tree.root(), el).unwrap();
    assert!(list.contains(&tree, "x"));
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_attribute_names_are_case_sensitive() {
    let mut tree = DomTree::new();
    let el = tree.create_element("div");
    tree.set_attribute(el, "data-X", "1").unwrap();
    tree.set_attribute(el, "data-x", "2").unwrap();
    assert_eq!(tree.attribute_names(el), vec!["data-X", "data-x"]);
    assert_eq!(tree.remove_attribute(el, "DATA-X"), None);
}

#[test]
fn test_empty_attribute_value() {
    let mut tree = DomTree::new();
    let el = tree.create_element("input");
    assert!(tree.toggle_attribute(el, "disabled", None).unwrap());
    assert_eq!(tree.get_attribute(el, "disabled"), Some(""));
    assert!(tree.has_attribute(el, "disabled"));
}

#[test]
fn test_text_content_of_empty_element() {
    let mut tree = DomTree::new();
    let el = tree.create_element("div");
    assert_eq!(tree.text_content(el).as_deref(), Some(""));
    tree.set_text_content(el, "").unwrap();
    assert!(!tree.has_child_nodes(el));
}
