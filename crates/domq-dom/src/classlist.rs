//! DOMTokenList (classList)
//!
//! Token set semantics over a space-separated attribute. [`TokenList`] owns
//! no tokens: it re-reads the backing attribute on every access and writes it
//! back after every mutation, so `set_attribute("class", ..)` and classList
//! calls always observe each other.

use crate::{DomError, DomResult, DomTree, NodeId};

/// Split a space-separated attribute value into tokens
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_ascii_whitespace()
}

/// Ordered set of unique tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    /// Create empty token set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut set = Self::new();
        for token in split_tokens(s) {
            set.insert(token);
        }
        set
    }

    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token, returns false if it was already present
    pub fn insert(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token, returns false if it was absent
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Replace `old` with `new`.
    ///
    /// When `new` is already present, whichever of the two comes first takes
    /// the value `new` and the other is dropped.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t == old) else {
            return false;
        };
        if old == new {
            return true;
        }
        match self.tokens.iter().position(|t| t == new) {
            Some(existing) if existing < pos => {
                self.tokens.remove(pos);
            }
            Some(existing) => {
                self.tokens.remove(existing);
                self.tokens[pos] = new.to_string();
            }
            None => self.tokens[pos] = new.to_string(),
        }
        true
    }

    /// Tokens joined by single spaces
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl std::fmt::Display for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

fn validate_token(token: &str) -> DomResult<()> {
    if token.is_empty() {
        return Err(DomError::Syntax);
    }
    // Same set split_tokens splits on
    if token.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(DomError::InvalidCharacter(token.to_string()));
    }
    Ok(())
}

/// Token list view bound to one attribute of one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList {
    element: NodeId,
    attribute: String,
}

impl TokenList {
    /// View over `attribute` of `element` (`class` for classList)
    pub fn new(element: NodeId, attribute: &str) -> Self {
        Self {
            element,
            attribute: attribute.to_string(),
        }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    /// Current token set, read from the attribute
    pub fn tokens(&self, tree: &DomTree) -> TokenSet {
        TokenSet::from_string(self.value(tree))
    }

    pub fn length(&self, tree: &DomTree) -> usize {
        self.tokens(tree).length()
    }

    pub fn item(&self, tree: &DomTree, index: usize) -> Option<String> {
        self.tokens(tree).item(index).map(str::to_string)
    }

    pub fn contains(&self, tree: &DomTree, token: &str) -> bool {
        split_tokens(self.value(tree)).any(|t| t == token)
    }

    /// Raw attribute value (empty when absent)
    pub fn value<'t>(&self, tree: &'t DomTree) -> &'t str {
        tree.get_attribute(self.element, &self.attribute)
            .unwrap_or("")
    }

    /// Overwrite the attribute verbatim
    pub fn set_value(&self, tree: &mut DomTree, value: &str) -> DomResult<()> {
        tree.set_attribute(self.element, &self.attribute, value)
    }

    fn flush(&self, tree: &mut DomTree, set: &TokenSet) -> DomResult<()> {
        if set.is_empty() {
            tree.remove_attribute(self.element, &self.attribute);
            Ok(())
        } else {
            tree.set_attribute(self.element, &self.attribute, &set.value())
        }
    }

    /// Element check up front so mutators fail before touching anything
    fn current(&self, tree: &DomTree) -> DomResult<TokenSet> {
        tree.check(self.element)?;
        if !tree.is_element(self.element) {
            return Err(DomError::InvalidNodeType(self.element));
        }
        Ok(self.tokens(tree))
    }

    pub fn add(&self, tree: &mut DomTree, tokens: &[&str]) -> DomResult<()> {
        tokens.iter().try_for_each(|t| validate_token(t))?;
        let mut set = self.current(tree)?;
        for token in tokens {
            set.insert(token);
        }
        self.flush(tree, &set)
    }

    pub fn remove(&self, tree: &mut DomTree, tokens: &[&str]) -> DomResult<()> {
        tokens.iter().try_for_each(|t| validate_token(t))?;
        let mut set = self.current(tree)?;
        for token in tokens {
            set.remove(token);
        }
        self.flush(tree, &set)
    }

    /// Toggle token, returns whether it is present afterwards
    pub fn toggle(&self, tree: &mut DomTree, token: &str, force: Option<bool>) -> DomResult<bool> {
        validate_token(token)?;
        let mut set = self.current(tree)?;
        let present = match force {
            Some(true) => {
                set.insert(token);
                true
            }
            Some(false) => {
                set.remove(token);
                false
            }
            None => !set.remove(token) && set.insert(token),
        };
        self.flush(tree, &set)?;
        Ok(present)
    }

    /// Replace a token; false and no write when `old` is absent
    pub fn replace(&self, tree: &mut DomTree, old: &str, new: &str) -> DomResult<bool> {
        validate_token(old)?;
        validate_token(new)?;
        let mut set = self.current(tree)?;
        if !set.replace(old, new) {
            return Ok(false);
        }
        self.flush(tree, &set)?;
        Ok(true)
    }
}
