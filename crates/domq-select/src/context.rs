//! Selector context
//!
//! Everything a query needs beyond the tree and the selector: configuration,
//! the handler for host pseudo-classes, and the parse cache. A context is
//! owned by the caller; nothing here is global.

use std::fmt;
use std::sync::Arc;

use domq_dom::{DomTree, NodeId, NodeList};

use crate::cache::{CacheStats, SelectorCache};
use crate::parser::{parse_selector_list, ParseError};
use crate::{matcher, select, SelectorInput, SelectorList};

/// How pseudo-classes unknown to the engine are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HostPseudoPolicy {
    /// Parse them; they match only through a [`PseudoClassHandler`]
    #[default]
    Delegate,
    /// Fail parsing
    Reject,
}

/// Selector engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    pub host_pseudo: HostPseudoPolicy,
    /// Parsed selectors kept by the context (0 disables caching)
    pub cache_capacity: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            host_pseudo: HostPseudoPolicy::Delegate,
            cache_capacity: 64,
        }
    }
}

/// Gives meaning to host pseudo-classes such as `:visible` or `:checked`
pub trait PseudoClassHandler {
    fn matches(
        &self,
        tree: &DomTree,
        element: NodeId,
        name: &str,
        argument: Option<&str>,
    ) -> bool;
}

impl<F> PseudoClassHandler for F
where
    F: Fn(&DomTree, NodeId, &str, Option<&str>) -> bool,
{
    fn matches(
        &self,
        tree: &DomTree,
        element: NodeId,
        name: &str,
        argument: Option<&str>,
    ) -> bool {
        self(tree, element, name, argument)
    }
}

/// Caller-owned selector engine state
pub struct SelectorContext {
    config: SelectorConfig,
    handler: Option<Box<dyn PseudoClassHandler>>,
    cache: SelectorCache,
}

impl fmt::Debug for SelectorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorContext")
            .field("config", &self.config)
            .field("handler", &self.handler.is_some())
            .field("cache", &self.cache.stats())
            .finish()
    }
}

impl Default for SelectorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorContext {
    pub fn new() -> Self {
        Self::with_config(SelectorConfig::default())
    }

    pub fn with_config(config: SelectorConfig) -> Self {
        Self {
            cache: SelectorCache::new(config.cache_capacity),
            config,
            handler: None,
        }
    }

    /// Install the host pseudo-class handler
    pub fn with_pseudo_handler(mut self, handler: impl PseudoClassHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Evaluate a host pseudo-class; false without a handler
    pub(crate) fn host_matches(
        &self,
        tree: &DomTree,
        element: NodeId,
        name: &str,
        argument: Option<&str>,
    ) -> bool {
        self.handler
            .as_ref()
            .is_some_and(|h| h.matches(tree, element, name, argument))
    }

    /// Parse through the cache
    pub fn parse(&mut self, text: &str) -> Result<Arc<SelectorList>, ParseError> {
        let policy = self.config.host_pseudo;
        self.cache
            .get_or_parse(text, |t| parse_selector_list(t, policy))
    }

    /// Parse at a query boundary: failures are logged and become `None`
    fn resolve(&mut self, text: &str) -> Option<Arc<SelectorList>> {
        match self.parse(text) {
            Ok(list) => Some(list),
            Err(err) => {
                tracing::debug!("Ignoring invalid selector {:?}: {}", text, err);
                None
            }
        }
    }

    /// Matches under `roots` (inclusive), in document order
    pub fn select<'a>(
        &mut self,
        tree: &DomTree,
        roots: &[NodeId],
        selector: impl Into<SelectorInput<'a>>,
    ) -> NodeList {
        match selector.into() {
            SelectorInput::Parsed(list) => select::select(tree, roots, list, self),
            SelectorInput::Text(text) => match self.resolve(text) {
                Some(list) => select::select(tree, roots, &list, self),
                None => NodeList::new(),
            },
        }
    }

    /// All matching descendants of `scope`, in document order
    ///
    /// Combinators are not confined to the scope: `li` as scope with
    /// `ul b` finds the `b` under it when an ancestor `ul` exists.
    pub fn query_selector_all(&mut self, tree: &DomTree, scope: NodeId, selector: &str) -> NodeList {
        let Some(list) = self.resolve(selector) else {
            return NodeList::new();
        };
        let ctx: &SelectorContext = self;
        let found: NodeList = tree
            .descendants(scope)
            .filter(|&n| matcher::matches_list(tree, n, &list, ctx))
            .collect();
        tracing::trace!("Query under {} selected {} nodes", scope, found.length());
        found
    }

    /// First matching descendant of `scope`
    pub fn query_selector(&mut self, tree: &DomTree, scope: NodeId, selector: &str) -> Option<NodeId> {
        let list = self.resolve(selector)?;
        let ctx: &SelectorContext = self;
        tree.descendants(scope).find(|&n| matcher::matches_list(tree, n, &list, ctx))
    }

    /// Whether `element` matches `selector`
    pub fn matches(&mut self, tree: &DomTree, element: NodeId, selector: &str) -> bool {
        match self.resolve(selector) {
            Some(list) => matcher::matches_list(tree, element, &list, self),
            None => false,
        }
    }

    /// Nearest inclusive ancestor element matching `selector`
    pub fn closest(&mut self, tree: &DomTree, element: NodeId, selector: &str) -> Option<NodeId> {
        let list = self.resolve(selector)?;
        std::iter::once(element)
            .chain(tree.ancestors(element))
            .filter(|&n| tree.is_element(n))
            .find(|&n| matcher::matches_list(tree, n, &list, self))
    }
}
