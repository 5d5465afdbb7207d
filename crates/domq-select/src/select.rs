//! Combinator evaluation
//!
//! Left-to-right selection: the leftmost compound seeds a candidate set from
//! the scope, and each combinator narrows it toward the subject. Every step
//! deduplicates, and the final union is emitted in document order.

use std::collections::HashSet;

use domq_dom::{DomTree, NodeId, NodeList};

use crate::ast::{Combinator, ComplexSelector, CompoundSelector, SelectorList};
use crate::matcher::matches_compound;
use crate::SelectorContext;

/// Elements under `roots` (inclusive) matching `list`, in document order
pub(crate) fn select(
    tree: &DomTree,
    roots: &[NodeId],
    list: &SelectorList,
    ctx: &SelectorContext,
) -> NodeList {
    let roots = normalize_roots(tree, roots);
    if roots.is_empty() {
        return NodeList::new();
    }

    let mut matched: HashSet<NodeId> = HashSet::new();
    for selector in list.iter() {
        matched.extend(select_complex(tree, &roots, selector, ctx));
    }

    let result: NodeList = roots
        .iter()
        .flat_map(|&root| tree.inclusive_descendants(root))
        .filter(|n| matched.contains(n))
        .collect();

    tracing::trace!(
        "Selected {} nodes for {:?} under {} roots",
        result.length(),
        list.to_string(),
        roots.len()
    );
    result
}

/// Existing roots in document order, without roots nested in other roots
fn normalize_roots(tree: &DomTree, roots: &[NodeId]) -> Vec<NodeId> {
    let mut keyed: Vec<(Vec<usize>, NodeId)> = roots
        .iter()
        .copied()
        .filter(|&r| tree.get(r).is_some())
        .map(|r| (tree.position_path(r), r))
        .collect();
    keyed.sort();
    keyed.dedup_by(|a, b| a.1 == b.1);

    // Pre-order sorting puts every nested root right after its covering root.
    let mut kept: Vec<(Vec<usize>, NodeId)> = Vec::with_capacity(keyed.len());
    for (path, root) in keyed {
        let nested = kept
            .last()
            .is_some_and(|(outer, _)| path.starts_with(outer));
        if !nested {
            kept.push((path, root));
        }
    }
    kept.into_iter().map(|(_, r)| r).collect()
}

fn select_complex(
    tree: &DomTree,
    roots: &[NodeId],
    selector: &ComplexSelector,
    ctx: &SelectorContext,
) -> Vec<NodeId> {
    let leftmost = selector.leftmost();
    let mut candidates: Vec<NodeId> = roots
        .iter()
        .flat_map(|&root| tree.inclusive_descendants(root))
        .filter(|&n| matches_compound(tree, n, leftmost, ctx))
        .collect();

    for (index, (_, combinator)) in selector.steps.iter().enumerate() {
        if candidates.is_empty() {
            break;
        }
        let Some(next) = selector.compound(index + 1) else {
            break;
        };
        candidates = expand(tree, &candidates, *combinator, next, ctx);
    }
    candidates
}

/// Apply one combinator to the candidate set, keeping nodes matching `next`
fn expand(
    tree: &DomTree,
    candidates: &[NodeId],
    combinator: Combinator,
    next: &CompoundSelector,
    ctx: &SelectorContext,
) -> Vec<NodeId> {
    let sources: HashSet<NodeId> = candidates.iter().copied().collect();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut out = Vec::new();
    let mut keep = |node: NodeId| {
        if seen.insert(node) && matches_compound(tree, node, next, ctx) {
            out.push(node);
        }
    };

    for &candidate in candidates {
        match combinator {
            Combinator::Child => {
                for child in tree.element_children(candidate) {
                    keep(child);
                }
            }
            Combinator::Descendant => {
                // A nested candidate expands its own subtree.
                let mut walk = tree.descendants(candidate);
                while let Some(node) = walk.next() {
                    if tree.is_element(node) {
                        keep(node);
                    }
                    if sources.contains(&node) {
                        walk.skip_children();
                    }
                }
            }
            Combinator::NextSibling => {
                if let Some(sibling) = tree.next_element_sibling(candidate) {
                    keep(sibling);
                }
            }
            Combinator::SubsequentSibling => {
                let mut sibling = tree.next_element_sibling(candidate);
                while let Some(s) = sibling {
                    keep(s);
                    // Later siblings are covered by that candidate.
                    if sources.contains(&s) {
                        break;
                    }
                    sibling = tree.next_element_sibling(s);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_selector_list, HostPseudoPolicy};
    use domq_dom::NodeOperations;

    fn run(tree: &DomTree, roots: &[NodeId], selector: &str) -> Vec<NodeId> {
        let list = parse_selector_list(selector, HostPseudoPolicy::Delegate).unwrap();
        select(tree, roots, &list, &SelectorContext::new()).to_vec()
    }

    /// Nested `div`s, each holding a `p`
    fn nested(depth: usize) -> (DomTree, Vec<NodeId>, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let mut divs = Vec::new();
        let mut ps = Vec::new();
        let mut parent = tree.root();
        for _ in 0..depth {
            let div = tree.create_element("div");
            let p = tree.create_element("p");
            tree.append_child(parent, div).unwrap();
            tree.append_child(div, p).unwrap();
            divs.push(div);
            ps.push(p);
            parent = div;
        }
        (tree, divs, ps)
    }

    #[test]
    fn test_descendant_dedups_nested_candidates() {
        let (tree, _, ps) = nested(4);
        // Every p has several div ancestors but appears once, in order.
        assert_eq!(run(&tree, &[tree.root()], "div p"), ps);
    }

    #[test]
    fn test_roots_are_inclusive() {
        let (tree, divs, ps) = nested(3);
        assert_eq!(run(&tree, &[divs[1]], "div"), vec![divs[1], divs[2]]);
        assert_eq!(run(&tree, &[divs[1]], "div > p"), vec![ps[1], ps[2]]);
    }

    #[test]
    fn test_overlapping_roots_visited_once() {
        let (tree, divs, ps) = nested(3);
        let found = run(&tree, &[divs[2], divs[0], divs[1], divs[0]], "p");
        assert_eq!(found, ps);
    }

    #[test]
    fn test_sibling_results_confined_to_scope() {
        // <ul><li/><li/><li/></ul>, scope = first li
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), ul).unwrap();
        let items: Vec<NodeId> = (0..3)
            .map(|_| {
                let li = tree.create_element("li");
                tree.append_child(ul, li).unwrap();
                li
            })
            .collect();

        assert!(run(&tree, &[items[0]], "li + li").is_empty());
        assert_eq!(run(&tree, &[ul], "li ~ li"), vec![items[1], items[2]]);
        assert_eq!(run(&tree, &[items[0], items[1]], "li + li"), vec![items[1]]);
    }

    #[test]
    fn test_unknown_roots_are_ignored() {
        let (tree, divs, _) = nested(1);
        let mut other = DomTree::new();
        for _ in 0..10 {
            other.create_element("x");
        }
        let stray = other.create_element("div");
        assert_eq!(run(&tree, &[stray, divs[0]], "div"), vec![divs[0]]);
    }

    #[test]
    fn test_union_is_in_document_order() {
        let (tree, divs, ps) = nested(2);
        let found = run(&tree, &[tree.root()], "p, div");
        assert_eq!(found, vec![divs[0], ps[0], divs[1], ps[1]]);
    }
}
