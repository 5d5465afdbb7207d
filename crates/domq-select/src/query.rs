//! Element Query Methods
//!
//! querySelector, querySelectorAll, closest, matches on the tree and the
//! document. Each call parses with a throwaway default context; callers that
//! run the same selectors repeatedly or need host pseudo-classes should hold
//! a [`SelectorContext`] instead.

use domq_dom::{Document, DomTree, NodeId, NodeList};

use crate::{SelectorConfig, SelectorContext};

/// Element query trait
pub trait SelectorQuery {
    /// First matching descendant of `scope`
    fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId>;

    /// All matching descendants of `scope`, in document order
    fn query_selector_all(&self, scope: NodeId, selector: &str) -> NodeList;

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, element: NodeId, selector: &str) -> Option<NodeId>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &str) -> bool;
}

fn one_shot() -> SelectorContext {
    SelectorContext::with_config(SelectorConfig {
        cache_capacity: 0,
        ..SelectorConfig::default()
    })
}

impl SelectorQuery for DomTree {
    fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        one_shot().query_selector(self, scope, selector)
    }

    fn query_selector_all(&self, scope: NodeId, selector: &str) -> NodeList {
        one_shot().query_selector_all(self, scope, selector)
    }

    fn closest(&self, element: NodeId, selector: &str) -> Option<NodeId> {
        one_shot().closest(self, element, selector)
    }

    fn matches(&self, element: NodeId, selector: &str) -> bool {
        one_shot().matches(self, element, selector)
    }
}

impl SelectorQuery for Document {
    fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.tree().query_selector(scope, selector)
    }

    fn query_selector_all(&self, scope: NodeId, selector: &str) -> NodeList {
        self.tree().query_selector_all(scope, selector)
    }

    fn closest(&self, element: NodeId, selector: &str) -> Option<NodeId> {
        self.tree().closest(element, selector)
    }

    fn matches(&self, element: NodeId, selector: &str) -> bool {
        self.tree().matches(element, selector)
    }
}
