//! Parsed selector cache
//!
//! Memoizes selector text to its parse outcome. Failures are cached as well,
//! so a bad selector in a hot loop costs one parse.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::{ParseError, SelectorList};

type ParseOutcome = Result<Arc<SelectorList>, ParseError>;

/// Bounded selector cache, evicting in insertion order
#[derive(Debug)]
pub struct SelectorCache {
    entries: HashMap<String, ParseOutcome>,
    /// Insertion order for eviction
    order: VecDeque<String>,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SelectorCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached outcome for `text`, running `parse` on a miss
    pub fn get_or_parse(
        &mut self,
        text: &str,
        parse: impl FnOnce(&str) -> Result<SelectorList, ParseError>,
    ) -> ParseOutcome {
        if let Some(outcome) = self.entries.get(text) {
            self.hits += 1;
            return outcome.clone();
        }

        self.misses += 1;
        let outcome = parse(text).map(Arc::new);
        if self.max_entries == 0 {
            return outcome;
        }

        // Evict if at capacity
        while self.entries.len() >= self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }

        self.entries.insert(text.to_string(), outcome.clone());
        self.order.push_back(text.to_string());
        outcome
    }

    /// Clear all cached selectors and counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stats
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}
