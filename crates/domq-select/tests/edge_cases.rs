//! Edge case tests for domq-select
//!
//! Hostile selector text, degenerate trees, scoping corners.

use domq_dom::{DomTree, NodeId, NodeOperations};
use domq_select::{
    node_matches_selector, parse_selector, select_nodes, try_parse_selector, HostPseudoPolicy,
    ParseErrorKind, SelectorConfig, SelectorContext, SelectorList, SelectorQuery, MAX_NESTING,
};

/// Route `tracing` output through the test harness (`RUST_LOG=domq_select=debug`)
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn chain(tree: &mut DomTree, tag: &str, depth: usize) -> Vec<NodeId> {
    let mut nodes = Vec::with_capacity(depth);
    let mut parent = tree.root();
    for _ in 0..depth {
        let el = tree.create_element(tag);
        tree.append_child(parent, el).unwrap();
        nodes.push(el);
        parent = el;
    }
    nodes
}

// ============================================================================
// Deep and wide trees
// ============================================================================

#[test]
fn test_deep_descendant_chain() {
    let mut tree = DomTree::new();
    let divs = chain(&mut tree, "div", 20_000);
    let found = select_nodes(&tree, &[tree.root()], "div div div");
    assert_eq!(found.length(), divs.len() - 2);
    assert_eq!(found.first(), Some(divs[2]));
}

#[test]
fn test_deep_backtracking_fails_fast() {
    let mut tree = DomTree::new();
    let divs = chain(&mut tree, "div", 20_000);
    let list = parse_selector("section div div").unwrap();
    assert!(!node_matches_selector(&tree, divs[divs.len() - 1], &list));
    assert!(select_nodes(&tree, &[tree.root()], &list).is_empty());
}

// Structural pseudo-classes and sibling lookups scan the parent's child list
// per element, so these widths are quadratic; keep them at a few thousand.
#[test]
fn test_wide_general_sibling() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul).unwrap();
    for _ in 0..5_000 {
        let li = tree.create_element("li");
        tree.append_child(ul, li).unwrap();
    }
    assert_eq!(select_nodes(&tree, &[ul], "li ~ li").length(), 4_999);
    assert_eq!(select_nodes(&tree, &[ul], "li + li + li").length(), 4_998);
    assert_eq!(select_nodes(&tree, &[ul], "li:nth-child(1000n)").length(), 5);
    assert_eq!(select_nodes(&tree, &[ul], "li:last-of-type").length(), 1);
}

// ============================================================================
// Invalid input at query boundaries
// ============================================================================

#[test]
fn test_invalid_selectors_select_nothing() {
    init_tracing();
    let mut tree = DomTree::new();
    let divs = chain(&mut tree, "div", 3);
    for bad in ["", "  ", ",", "div,", "div >", "~ div", "div::after", "[", "[a", "div)", ":nth-child(2n+)", ":not(", "#", "..a"] {
        assert!(select_nodes(&tree, &[tree.root()], bad).is_empty(), "{bad:?}");
        assert!(!tree.matches(divs[0], bad), "{bad:?}");
        assert!(tree.closest(divs[2], bad).is_none(), "{bad:?}");
        assert!(parse_selector(bad).is_none(), "{bad:?}");
    }
}

#[test]
fn test_nesting_limit_is_an_error_not_a_crash() {
    let depth = MAX_NESTING * 4;
    let text = format!("{}div{}", ":is(".repeat(depth), ")".repeat(depth));
    assert_eq!(try_parse_selector(&text).unwrap_err().kind, ParseErrorKind::TooDeep);
}

#[test]
fn test_error_offsets_point_into_the_text() {
    let err = try_parse_selector("div > p[data-x=\"y").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    assert_eq!(err.offset, 15);
    assert!(err.to_string().contains("offset 15"));
}

// ============================================================================
// Scoping
// ============================================================================

#[test]
fn test_empty_roots() {
    let mut tree = DomTree::new();
    chain(&mut tree, "div", 2);
    assert!(select_nodes(&tree, &[], "div").is_empty());
}

#[test]
fn test_text_root_matches_nothing() {
    let mut tree = DomTree::new();
    let divs = chain(&mut tree, "div", 1);
    let text = tree.create_text("hi");
    tree.append_child(divs[0], text).unwrap();
    assert!(select_nodes(&tree, &[text], "*").is_empty());
    assert!(!tree.matches(text, "*"));
    assert_eq!(tree.closest(text, "div"), Some(divs[0]));
}

#[test]
fn test_detached_subtree_selection() {
    let mut tree = DomTree::new();
    let detached = tree.create_element("section");
    let child = tree.create_element("p");
    tree.append_child(detached, child).unwrap();

    assert!(select_nodes(&tree, &[tree.root()], "p").is_empty());
    assert_eq!(select_nodes(&tree, &[detached], "section > p").to_vec(), vec![child]);
    assert!(tree.matches(detached, ":root"));
}

#[test]
fn test_fragment_children() {
    let mut tree = DomTree::new();
    let fragment = tree.create_document_fragment();
    let a = tree.create_element("a");
    let b = tree.create_element("b");
    tree.append_child(fragment, a).unwrap();
    tree.append_child(fragment, b).unwrap();

    assert_eq!(tree.query_selector_all(fragment, "a + b").to_vec(), vec![b]);
    assert!(!tree.matches(a, ":root"));
    assert!(tree.matches(a, ":first-child"));
}

#[test]
fn test_mutation_between_queries() {
    let mut tree = DomTree::new();
    let divs = chain(&mut tree, "div", 2);
    assert!(tree.matches(divs[1], "div > div:only-child"));
    let sibling = tree.create_element("div");
    tree.append_child(divs[0], sibling).unwrap();
    assert!(!tree.matches(divs[1], "div > div:only-child"));

    tree.set_attribute(sibling, "class", "late").unwrap();
    assert_eq!(tree.query_selector(tree.root(), ".late"), Some(sibling));
}

// ============================================================================
// Names, escapes, case
// ============================================================================

#[test]
fn test_escaped_identifiers() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attributes("div", [("id", "a:b"), ("class", "1st")]);
    tree.append_child(tree.root(), el).unwrap();

    assert!(tree.matches(el, r"#a\:b"));
    assert!(tree.matches(el, r".\31 st"));
    assert!(parse_selector(".1st").is_none());
}

#[test]
fn test_case_rules() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attributes("DIV", [("data-Kind", "Big"), ("class", "Box")]);
    tree.append_child(tree.root(), el).unwrap();

    assert!(tree.matches(el, "div"));
    assert!(tree.matches(el, "[data-kind]"));
    assert!(tree.matches(el, "[data-Kind=Big]"));
    assert!(!tree.matches(el, "[data-Kind=big]"));
    assert!(tree.matches(el, "[data-Kind=big i]"));
    assert!(!tree.matches(el, ".box"));
}

#[test]
fn test_unicode_values() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attributes("p", [("title", "naïve café")]);
    let text = tree.create_text("日本語のテキスト");
    tree.append_child(el, text).unwrap();
    tree.append_child(tree.root(), el).unwrap();

    assert!(tree.matches(el, "[title*=\"ve c\"]"));
    assert!(tree.matches(el, "[title~=café]"));
    assert!(tree.matches(el, ":contains(のテ)"));
}

// ============================================================================
// Host pseudo-classes
// ============================================================================

#[test]
fn test_host_pseudo_classes_through_context() {
    let mut tree = DomTree::new();
    let divs = chain(&mut tree, "div", 3);
    tree.set_attribute(divs[1], "hidden", "").unwrap();

    // Free functions know nothing about :visible
    assert!(select_nodes(&tree, &[tree.root()], "div:visible").is_empty());

    let mut ctx = SelectorContext::new().with_pseudo_handler(
        |tree: &DomTree, el: NodeId, name: &str, arg: Option<&str>| match name {
            "visible" => !std::iter::once(el)
                .chain(tree.ancestors(el))
                .any(|n| tree.has_attribute(n, "hidden")),
            "eq" => arg
                .and_then(|a| a.parse::<usize>().ok())
                .is_some_and(|i| tree.index_in_parent(el) == Some(i)),
            _ => false,
        },
    );
    assert_eq!(ctx.select(&tree, &[tree.root()], "div:visible").to_vec(), vec![divs[0]]);
    assert_eq!(ctx.select(&tree, &[tree.root()], "div:eq( 0 )").length(), 3);

    let list: SelectorList = "div:VISIBLE".parse().unwrap();
    assert_eq!(list.to_string(), "div:visible");
}

#[test]
fn test_reject_policy_rejects_unknown_pseudo_classes() {
    let mut ctx = SelectorContext::with_config(SelectorConfig {
        host_pseudo: HostPseudoPolicy::Reject,
        cache_capacity: 0,
    });
    let err = ctx.parse("li:hover").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnsupportedPseudoClass("hover".into()));
    assert!(ctx.parse("li:first-child").is_ok());
    assert_eq!(ctx.cache_stats().entries, 0);
}
