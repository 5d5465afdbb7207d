//! Selector AST
//!
//! A parsed selector is plain owned data: it can be cloned, cached, shared
//! between threads and evaluated any number of times.

use std::fmt;

use crate::NthExpression;

/// Comma-separated alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplexSelector> {
        self.selectors.iter()
    }
}

/// Compound selectors joined by combinators, read left to right.
///
/// `div > p a` is `steps = [(div, Child), (p, Descendant)]`, `subject = a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub steps: Vec<(CompoundSelector, Combinator)>,
    pub subject: CompoundSelector,
}

impl ComplexSelector {
    /// Selector made of a single compound
    pub fn simple(subject: CompoundSelector) -> Self {
        Self {
            steps: Vec::new(),
            subject,
        }
    }

    /// The compound matched first by a left-to-right evaluation
    pub fn leftmost(&self) -> &CompoundSelector {
        self.steps.first().map_or(&self.subject, |(c, _)| c)
    }

    /// Compound at `index`, counting the subject last
    pub fn compound(&self, index: usize) -> Option<&CompoundSelector> {
        if index == self.steps.len() {
            Some(&self.subject)
        } else {
            self.steps.get(index).map(|(c, _)| c)
        }
    }

    /// Number of compounds including the subject
    pub fn compound_count(&self) -> usize {
        self.steps.len() + 1
    }
}

/// Combinator between selector parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant (whitespace)
    Descendant,
    /// Child (>)
    Child,
    /// Adjacent sibling (+)
    NextSibling,
    /// General sibling (~)
    SubsequentSibling,
}

/// Type selector plus simple selectors, all of which must hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub type_selector: TypeSelector,
    pub simple: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn universal() -> Self {
        Self {
            type_selector: TypeSelector::Universal,
            simple: Vec::new(),
        }
    }

    pub fn tag(name: &str) -> Self {
        Self {
            type_selector: TypeSelector::Tag(name.to_string()),
            simple: Vec::new(),
        }
    }

    /// True when the compound says nothing at all (`*` or an omitted type)
    pub fn is_universal(&self) -> bool {
        self.type_selector == TypeSelector::Universal && self.simple.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelector {
    /// `*`, or no type given
    Universal,
    /// Tag name, compared ASCII case-insensitively
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[attr]`, `[attr=value]`, ...
    Attribute(AttributeSelector),
    /// `:pseudo`, `:pseudo(arg)`
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: AttributeOperator,
    /// Empty for `Exists`
    pub value: String,
    pub case: CaseSensitivity,
}

/// Attribute comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Equals,
    /// `[attr~=value]` - whitespace-separated word
    Includes,
    /// `[attr|=value]` - value or value-...
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
}

impl AttributeOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// Value comparison mode of an attribute selector (`i` / `s` flag)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    #[default]
    CaseSensitive,
    AsciiCaseInsensitive,
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),

    /// `:contains(text)` - substring of the element's text content
    Contains(String),

    /// Any other pseudo-class; meaning is supplied by the caller's context
    Host {
        name: String,
        argument: Option<String>,
    },
}

// ----------------------------------------------------------------------
// Serialization back to selector text
// ----------------------------------------------------------------------

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (compound, combinator) in &self.steps {
            write!(f, "{}{}", compound, combinator)?;
        }
        write!(f, "{}", self.subject)
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        })
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_selector {
            TypeSelector::Tag(tag) => write_ident(f, tag)?,
            TypeSelector::Universal if self.simple.is_empty() => f.write_str("*")?,
            TypeSelector::Universal => {}
        }
        for simple in &self.simple {
            match simple {
                SimpleSelector::Id(id) => {
                    f.write_str("#")?;
                    write_ident(f, id)?;
                }
                SimpleSelector::Class(class) => {
                    f.write_str(".")?;
                    write_ident(f, class)?;
                }
                SimpleSelector::Attribute(attr) => write!(f, "{}", attr)?,
                SimpleSelector::PseudoClass(pseudo) => write!(f, "{}", pseudo)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_ident(f, &self.name)?;
        if self.operator != AttributeOperator::Exists {
            f.write_str(self.operator.as_str())?;
            write_string(f, &self.value)?;
            if self.case == CaseSensitivity::AsciiCaseInsensitive {
                f.write_str(" i")?;
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str(":root"),
            Self::Empty => f.write_str(":empty"),
            Self::FirstChild => f.write_str(":first-child"),
            Self::LastChild => f.write_str(":last-child"),
            Self::OnlyChild => f.write_str(":only-child"),
            Self::FirstOfType => f.write_str(":first-of-type"),
            Self::LastOfType => f.write_str(":last-of-type"),
            Self::OnlyOfType => f.write_str(":only-of-type"),
            Self::NthChild(e) => write!(f, ":nth-child({})", e),
            Self::NthLastChild(e) => write!(f, ":nth-last-child({})", e),
            Self::NthOfType(e) => write!(f, ":nth-of-type({})", e),
            Self::NthLastOfType(e) => write!(f, ":nth-last-of-type({})", e),
            Self::Not(list) => write!(f, ":not({})", list),
            Self::Is(list) => write!(f, ":is({})", list),
            Self::Where(list) => write!(f, ":where({})", list),
            Self::Contains(text) => {
                f.write_str(":contains(")?;
                write_string(f, text)?;
                f.write_str(")")
            }
            Self::Host { name, argument } => {
                f.write_str(":")?;
                write_ident(f, name)?;
                match argument {
                    Some(arg) => write!(f, "({})", arg),
                    None => Ok(()),
                }
            }
        }
    }
}

fn write_ident(f: &mut fmt::Formatter<'_>, ident: &str) -> fmt::Result {
    for (i, c) in ident.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
        if !plain || (i == 0 && c.is_ascii_digit()) {
            if c.is_ascii_digit() || c.is_ascii_control() {
                write!(f, "\\{:x} ", c as u32)?;
            } else {
                write!(f, "\\{}", c)?;
            }
        } else {
            write!(f, "{}", c)?;
        }
    }
    Ok(())
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' | '\\' => write!(f, "\\{}", c)?,
            c if c.is_control() => write!(f, "\\{:x} ", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}
