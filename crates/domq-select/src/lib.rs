//! domq Select - CSS selector engine
//!
//! Parses selector text into an immutable AST and evaluates it against a
//! [`DomTree`]: `querySelector`-style queries, `matches`, `closest`, and
//! multi-root selection with document-ordered, deduplicated results.
//!
//! ```text
//! text -> tokenizer -> parser -> SelectorList -> matcher (one element, right to left)
//!                                             -> select  (whole scope, left to right)
//! ```

mod ast;
mod cache;
mod context;
mod matcher;
mod nth;
mod parser;
mod query;
mod select;
mod tokenizer;

pub use ast::{
    AttributeOperator, AttributeSelector, CaseSensitivity, Combinator, ComplexSelector,
    CompoundSelector, PseudoClass, SelectorList, SimpleSelector, TypeSelector,
};
pub use cache::{CacheStats, SelectorCache};
pub use context::{HostPseudoPolicy, PseudoClassHandler, SelectorConfig, SelectorContext};
pub use matcher::{matches_attribute, matches_complex, matches_compound, matches_list};
pub use nth::NthExpression;
pub use parser::{parse_selector_list, ParseError, ParseErrorKind, MAX_NESTING};
pub use query::SelectorQuery;

use domq_dom::{DomTree, NodeId, NodeList};

/// Selector given as text or as an already parsed list
#[derive(Debug, Clone, Copy)]
pub enum SelectorInput<'a> {
    Text(&'a str),
    Parsed(&'a SelectorList),
}

impl<'a> From<&'a str> for SelectorInput<'a> {
    fn from(text: &'a str) -> Self {
        SelectorInput::Text(text)
    }
}

impl<'a> From<&'a String> for SelectorInput<'a> {
    fn from(text: &'a String) -> Self {
        SelectorInput::Text(text)
    }
}

impl<'a> From<&'a SelectorList> for SelectorInput<'a> {
    fn from(list: &'a SelectorList) -> Self {
        SelectorInput::Parsed(list)
    }
}

/// Parse selector text; `None` when it is not a valid selector
pub fn parse_selector(text: &str) -> Option<SelectorList> {
    match try_parse_selector(text) {
        Ok(list) => Some(list),
        Err(err) => {
            tracing::debug!("Ignoring invalid selector {:?}: {}", text, err);
            None
        }
    }
}

/// Parse selector text, keeping the reason for a failure
pub fn try_parse_selector(text: &str) -> Result<SelectorList, ParseError> {
    parse_selector_list(text, HostPseudoPolicy::default())
}

/// Whether `node` is an element matching `selector`
pub fn node_matches_selector(tree: &DomTree, node: NodeId, selector: &SelectorList) -> bool {
    matches_list(tree, node, selector, &SelectorContext::new())
}

/// Elements under `roots` (inclusive) matching `selector`, in document order.
///
/// Text that does not parse selects nothing.
pub fn select_nodes<'a>(
    tree: &DomTree,
    roots: &[NodeId],
    selector: impl Into<SelectorInput<'a>>,
) -> NodeList {
    SelectorContext::new().select(tree, roots, selector)
}
