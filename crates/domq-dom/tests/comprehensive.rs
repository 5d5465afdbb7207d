//! Comprehensive tests for domq-dom
//!
//! Tree mutation, cloning, token lists and collections through the public API.

use domq_dom::{
    Document, DomError, DomTree, HtmlCollection, NodeId, NodeKind, NodeOperations, TreeWalker,
    WhatToShow,
};

/// `<ul><li class="a">x</li><li class="b">y</li><li class="a">z</li></ul>`
fn list_document() -> (DomTree, NodeId, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul).unwrap();
    let mut items = Vec::new();
    for (class, text) in [("a", "x"), ("b", "y"), ("a", "z")] {
        let li = tree.create_element_with_attributes("li", [("class", class)]);
        let t = tree.create_text(text);
        tree.append_child(li, t).unwrap();
        tree.append_child(ul, li).unwrap();
        items.push(li);
    }
    (tree, ul, items)
}

#[test]
fn test_build_and_navigate() {
    let (tree, ul, items) = list_document();

    assert_eq!(tree.parent(ul), Some(tree.root()));
    assert_eq!(tree.first_child(ul), Some(items[0]));
    assert_eq!(tree.last_child(ul), Some(items[2]));
    assert_eq!(tree.next_sibling(items[0]), Some(items[1]));
    assert_eq!(tree.previous_sibling(items[2]), Some(items[1]));
    assert_eq!(tree.parent_element(items[1]), Some(ul));
    assert_eq!(tree.parent_element(ul), None);
    assert_eq!(tree.text_content(ul).as_deref(), Some("xyz"));
    assert_eq!(tree.node_name(items[0]), "LI");
    assert_eq!(tree.kind(ul).map(NodeKind::node_type), Some(1));
}

#[test]
fn test_append_child_moves_between_parents() {
    let (mut tree, ul, items) = list_document();
    let ol = tree.create_element("ol");
    tree.append_child(tree.root(), ol).unwrap();

    tree.append_child(ol, items[1]).unwrap();

    assert_eq!(tree.children(ul), &[items[0], items[2]]);
    assert_eq!(tree.children(ol), &[items[1]]);
    assert_eq!(tree.next_sibling(items[0]), Some(items[2]));
}

#[test]
fn test_insert_before() {
    let (mut tree, ul, items) = list_document();
    let li = tree.create_element("li");

    tree.insert_before(ul, li, Some(items[1])).unwrap();
    assert_eq!(tree.children(ul), &[items[0], li, items[1], items[2]]);

    let tail = tree.create_element("li");
    tree.insert_before(ul, tail, None).unwrap();
    assert_eq!(tree.last_child(ul), Some(tail));
}

#[test]
fn test_remove_child_not_a_child() {
    let (mut tree, ul, items) = list_document();
    let other = tree.create_element("div");
    let stray = tree.create_element("span");
    tree.append_child(other, stray).unwrap();

    let err = tree.remove_child(ul, stray).unwrap_err();
    assert_eq!(err, DomError::NotAChild { parent: ul, child: stray });
    assert_eq!(err.name(), "NotFoundError");

    assert_eq!(tree.children(ul), items.as_slice());
    assert_eq!(tree.children(other), &[stray]);
}

#[test]
fn test_replace_child() {
    let (mut tree, ul, items) = list_document();
    let fresh = tree.create_element("li");

    let old = tree.replace_child(ul, fresh, items[1]).unwrap();
    assert_eq!(old, items[1]);
    assert_eq!(tree.children(ul), &[items[0], fresh, items[2]]);
    assert_eq!(tree.parent(items[1]), None);

    let stranger = tree.create_element("li");
    let err = tree.replace_child(ul, stranger, items[1]).unwrap_err();
    assert_eq!(err.name(), "NotFoundError");
    assert_eq!(tree.parent(stranger), None);
}

#[test]
fn test_deep_clone_is_independent() {
    let (mut tree, ul, items) = list_document();
    let copy = tree.clone_node(ul, true).unwrap();

    assert_eq!(tree.parent(copy), None);
    assert_eq!(tree.children(copy).len(), 3);
    for (orig, cloned) in items.iter().zip(tree.children(copy).to_vec()) {
        assert_ne!(*orig, cloned);
        assert_eq!(tree.class_name(*orig), tree.class_name(cloned));
        assert_eq!(tree.text_content(*orig), tree.text_content(cloned));
    }

    let first_copy = tree.children(copy)[0];
    tree.set_attribute(first_copy, "class", "changed").unwrap();
    let copied_text = tree.first_child(first_copy).unwrap();
    tree.set_node_value(copied_text, "changed").unwrap();

    assert_eq!(tree.class_name(items[0]), Some("a"));
    assert_eq!(tree.text_content(items[0]).as_deref(), Some("x"));
}

#[test]
fn test_class_list_round_trip() {
    let (mut tree, _, items) = list_document();
    let el = items[0];
    let list = tree.class_list(el);

    list.add(&mut tree, &["extra"]).unwrap();
    assert_eq!(tree.class_name(el), Some("a extra"));
    list.remove(&mut tree, &["extra"]).unwrap();
    assert_eq!(tree.class_name(el), Some("a"));

    let bare = tree.create_element("p");
    let bare_list = tree.class_list(bare);
    bare_list.add(&mut tree, &["a"]).unwrap();
    bare_list.remove(&mut tree, &["a"]).unwrap();
    assert!(!tree.has_attribute(bare, "class"));
}

#[test]
fn test_class_list_double_space_and_empty_token() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attributes("div", [("class", "foo  bar")]);
    let list = tree.class_list(el);

    assert_eq!(list.length(&tree), 2);
    assert!(list.contains(&tree, "foo"));
    assert!(list.contains(&tree, "bar"));

    let err = list.add(&mut tree, &[""]).unwrap_err();
    assert_eq!(err.name(), "SyntaxError");
    assert_eq!(tree.class_name(el), Some("foo  bar"));
    assert_eq!(list.length(&tree), 2);
}

#[test]
fn test_live_collections_follow_mutation() {
    let (mut tree, ul, items) = list_document();
    let by_class = HtmlCollection::by_class_names(tree.root(), "a");
    let children = HtmlCollection::children(ul);
    let frozen = by_class.to_node_list(&tree);

    assert_eq!(frozen.to_vec(), vec![items[0], items[2]]);

    tree.class_list(items[1]).add(&mut tree, &["a"]).unwrap();
    tree.remove_child(ul, items[2]).unwrap();

    assert_eq!(by_class.to_node_list(&tree).to_vec(), vec![items[0], items[1]]);
    assert_eq!(children.length(&tree), 2);
    assert_eq!(frozen.to_vec(), vec![items[0], items[2]]);
}

#[test]
fn test_document_queries() {
    let mut doc = Document::new("about:blank");
    let p = doc.tree_mut().create_element_with_attributes("p", [("id", "intro"), ("class", "lead")]);
    doc.append_to_body(p).unwrap();

    assert_eq!(doc.get_element_by_id("intro"), Some(p));
    assert_eq!(doc.get_elements_by_class_name("lead").item(doc.tree(), 0), Some(p));
    assert_eq!(doc.get_elements_by_tag_name("P").length(doc.tree()), 1);
}

#[test]
fn test_tree_walker_over_document() {
    let (tree, ul, items) = list_document();
    let mut walker = TreeWalker::new(tree.root(), WhatToShow::TEXT);

    let mut texts = Vec::new();
    while let Some(n) = walker.next_node(&tree) {
        texts.push(tree.node_value(n).unwrap_or_default().to_string());
    }
    assert_eq!(texts, ["x", "y", "z"]);

    let mut elements = TreeWalker::new(ul, WhatToShow::ELEMENT);
    assert_eq!(elements.first_child(&tree), Some(items[0]));
    assert_eq!(elements.next_sibling(&tree), Some(items[1]));
}

#[test]
fn test_fragment_insertion() {
    let (mut tree, ul, items) = list_document();
    let frag = tree.create_document_fragment();
    let n1 = tree.create_element("li");
    let n2 = tree.create_element("li");
    tree.append_child(frag, n1).unwrap();
    tree.append_child(frag, n2).unwrap();

    tree.insert_before(ul, frag, Some(items[1])).unwrap();
    assert_eq!(tree.children(ul), &[items[0], n1, n2, items[1], items[2]]);
    assert!(!tree.has_child_nodes(frag));
}
