//! Selector Matching
//!
//! Decides whether a single element satisfies a selector. Compound selectors
//! are a conjunction of simple selectors; complex selectors are evaluated
//! right to left from the subject, backtracking over ancestors and earlier
//! siblings.

use std::borrow::Cow;
use std::collections::HashSet;

use domq_dom::{split_tokens, DomTree, Node, NodeId, NodeKind};

use crate::ast::{
    AttributeOperator, AttributeSelector, CaseSensitivity, Combinator, ComplexSelector,
    CompoundSelector, PseudoClass, SelectorList, SimpleSelector, TypeSelector,
};
use crate::nth::is_css_whitespace;
use crate::SelectorContext;

/// Whether `element` matches any alternative of `list`
pub fn matches_list(
    tree: &DomTree,
    element: NodeId,
    list: &SelectorList,
    ctx: &SelectorContext,
) -> bool {
    tree.is_element(element) && list.iter().any(|s| matches_complex(tree, element, s, ctx))
}

/// How a pending compound is searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Search {
    /// This node only
    Exact,
    /// This node or any ancestor element
    Ancestors,
    /// This node or any earlier element sibling
    PrecedingSiblings,
}

/// Right-to-left evaluation of a complex selector with `element` as subject.
///
/// Descendant and general-sibling steps climb one node at a time, and each
/// (compound, node, search) state is expanded at most once, so a failing
/// match on a deep tree stays linear in its depth.
pub fn matches_complex(
    tree: &DomTree,
    element: NodeId,
    selector: &ComplexSelector,
    ctx: &SelectorContext,
) -> bool {
    let mut stack = vec![(selector.steps.len(), element, Search::Exact)];
    let mut visited: HashSet<(usize, NodeId, Search)> = HashSet::new();

    while let Some((index, node, search)) = stack.pop() {
        if !visited.insert((index, node, search)) {
            continue;
        }
        match search {
            Search::Exact => {}
            Search::Ancestors => {
                if let Some(parent) = tree.parent_element(node) {
                    stack.push((index, parent, Search::Ancestors));
                }
            }
            Search::PrecedingSiblings => {
                if let Some(sibling) = tree.previous_element_sibling(node) {
                    stack.push((index, sibling, Search::PrecedingSiblings));
                }
            }
        }

        let Some(compound) = selector.compound(index) else {
            continue;
        };
        if !matches_compound(tree, node, compound, ctx) {
            continue;
        }
        if index == 0 {
            return true;
        }

        let next = index - 1;
        let step = match selector.steps[next].1 {
            Combinator::Child => tree.parent_element(node).map(|n| (n, Search::Exact)),
            Combinator::Descendant => tree.parent_element(node).map(|n| (n, Search::Ancestors)),
            Combinator::NextSibling => tree
                .previous_element_sibling(node)
                .map(|n| (n, Search::Exact)),
            Combinator::SubsequentSibling => tree
                .previous_element_sibling(node)
                .map(|n| (n, Search::PrecedingSiblings)),
        };
        if let Some((n, search)) = step {
            stack.push((next, n, search));
        }
    }
    false
}

/// Every part of `compound` holds for `element`
pub fn matches_compound(
    tree: &DomTree,
    element: NodeId,
    compound: &CompoundSelector,
    ctx: &SelectorContext,
) -> bool {
    let Some(tag) = tree.tag_name(element) else {
        return false;
    };
    if let TypeSelector::Tag(name) = &compound.type_selector {
        if !tag.eq_ignore_ascii_case(name) {
            return false;
        }
    }
    compound
        .simple
        .iter()
        .all(|simple| matches_simple(tree, element, simple, ctx))
}

fn matches_simple(
    tree: &DomTree,
    element: NodeId,
    simple: &SimpleSelector,
    ctx: &SelectorContext,
) -> bool {
    match simple {
        SimpleSelector::Id(id) => tree.element_id(element) == Some(id.as_str()),
        SimpleSelector::Class(class) => tree
            .class_name(element)
            .is_some_and(|value| split_tokens(value).any(|c| c == class)),
        SimpleSelector::Attribute(attr) => {
            matches_attribute(attr, attribute_value(tree, element, &attr.name))
        }
        SimpleSelector::PseudoClass(pseudo) => matches_pseudo_class(tree, element, pseudo, ctx),
    }
}

/// Attribute lookup by exact name, then ASCII case-insensitively
fn attribute_value<'t>(tree: &'t DomTree, element: NodeId, name: &str) -> Option<&'t str> {
    let attrs = tree.attributes(element)?;
    attrs.get_attribute(name).or_else(|| {
        attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    })
}

/// Apply an attribute predicate to the stored value (`None` when absent)
pub fn matches_attribute(attr: &AttributeSelector, value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    if attr.operator == AttributeOperator::Exists {
        return true;
    }

    let (value, expected) = match attr.case {
        CaseSensitivity::CaseSensitive => (Cow::Borrowed(value), Cow::Borrowed(attr.value.as_str())),
        CaseSensitivity::AsciiCaseInsensitive => (
            Cow::Owned(value.to_ascii_lowercase()),
            Cow::Owned(attr.value.to_ascii_lowercase()),
        ),
    };
    let (value, expected) = (value.as_ref(), expected.as_ref());

    match attr.operator {
        AttributeOperator::Exists => true,
        AttributeOperator::Equals => value == expected,
        AttributeOperator::Includes => {
            !expected.is_empty()
                && !expected.contains(is_css_whitespace)
                && value.split(is_css_whitespace).any(|word| word == expected)
        }
        AttributeOperator::DashMatch => {
            value == expected
                || value
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttributeOperator::Prefix => !expected.is_empty() && value.starts_with(expected),
        AttributeOperator::Suffix => !expected.is_empty() && value.ends_with(expected),
        AttributeOperator::Substring => !expected.is_empty() && value.contains(expected),
    }
}

/// Match a pseudo-class against an element
fn matches_pseudo_class(
    tree: &DomTree,
    element: NodeId,
    pseudo: &PseudoClass,
    ctx: &SelectorContext,
) -> bool {
    match pseudo {
        // Tree-structural pseudo-classes
        PseudoClass::Root => match tree.parent(element) {
            None => true,
            Some(parent) => tree.kind(parent) == Some(NodeKind::Document),
        },
        PseudoClass::Empty => tree.children(element).iter().all(|&child| {
            tree.get(child)
                .and_then(Node::as_text)
                .is_some_and(|text| text.chars().all(is_css_whitespace))
        }),
        PseudoClass::FirstChild => sibling_position(tree, element, false).index == 1,
        PseudoClass::LastChild => sibling_position(tree, element, false).is_last(),
        PseudoClass::OnlyChild => sibling_position(tree, element, false).count == 1,
        PseudoClass::FirstOfType => sibling_position(tree, element, true).index == 1,
        PseudoClass::LastOfType => sibling_position(tree, element, true).is_last(),
        PseudoClass::OnlyOfType => sibling_position(tree, element, true).count == 1,
        PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, element, false).index),
        PseudoClass::NthLastChild(expr) => {
            expr.matches(sibling_position(tree, element, false).from_end())
        }
        PseudoClass::NthOfType(expr) => expr.matches(sibling_position(tree, element, true).index),
        PseudoClass::NthLastOfType(expr) => {
            expr.matches(sibling_position(tree, element, true).from_end())
        }

        // Logical pseudo-classes
        PseudoClass::Not(list) => !matches_list(tree, element, list, ctx),
        PseudoClass::Is(list) | PseudoClass::Where(list) => matches_list(tree, element, list, ctx),

        PseudoClass::Contains(text) => tree
            .text_content(element)
            .is_some_and(|content| content.contains(text.as_str())),

        PseudoClass::Host { name, argument } => {
            ctx.host_matches(tree, element, name, argument.as_deref())
        }
    }
}

/// 1-based position among element siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SiblingPosition {
    index: usize,
    count: usize,
}

impl SiblingPosition {
    fn is_last(self) -> bool {
        self.index == self.count
    }

    fn from_end(self) -> usize {
        self.count - self.index + 1
    }
}

/// Position of `element` among its element siblings, optionally only those
/// sharing its tag. A parentless element is the only child.
///
/// Scans the whole child list on every call, so a structural pseudo-class
/// over N siblings costs O(N²) per query.
// TODO: compute positions once per parent in `select::expand` and pass them in.
fn sibling_position(tree: &DomTree, element: NodeId, same_type: bool) -> SiblingPosition {
    let Some(parent) = tree.parent(element) else {
        return SiblingPosition { index: 1, count: 1 };
    };
    let tag = tree.tag_name(element).unwrap_or_default();

    let mut index = 1;
    let mut count = 0;
    for sibling in tree.element_children(parent) {
        if same_type && !tree.tag_name(sibling).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        count += 1;
        if sibling == element {
            index = count;
        }
    }
    SiblingPosition { index, count }
}
