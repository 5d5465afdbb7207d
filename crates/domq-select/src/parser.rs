//! Selector parser
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! list     := complex ( "," complex )*
//! complex  := compound ( combinator compound )*
//! compound := [ type | "*" ] ( "#id" | ".class" | "[attr]" | ":pseudo" )*
//! ```
//!
//! Selector lists nested in `:not()`, `:is()` and `:where()` are parsed by a
//! child parser over the raw argument text, bounded by [`MAX_NESTING`].

use std::str::FromStr;

use crate::ast::{
    AttributeOperator, AttributeSelector, CaseSensitivity, Combinator, ComplexSelector,
    CompoundSelector, PseudoClass, SelectorList, SimpleSelector, TypeSelector,
};
use crate::tokenizer::{tokenize, Token, TokenKind};
use crate::{HostPseudoPolicy, NthExpression};

/// Deepest allowed nesting of `:not()` / `:is()` / `:where()`
pub const MAX_NESTING: usize = 32;

/// Malformed selector text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector at offset {offset}: {kind}")]
pub struct ParseError {
    /// Byte offset in the selector text
    pub offset: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("empty selector")]
    Empty,
    #[error("expected a selector")]
    ExpectedSelector,
    #[error("unexpected `{0}`")]
    UnexpectedToken(String),
    #[error("combinator is not followed by a selector")]
    DanglingCombinator,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    #[error("expected an attribute name")]
    ExpectedAttributeName,
    #[error("invalid attribute operator")]
    InvalidAttributeOperator,
    #[error("expected an attribute value")]
    ExpectedAttributeValue,
    #[error("invalid attribute flag `{0}`")]
    InvalidAttributeFlag(String),
    #[error("expected an identifier")]
    ExpectedIdentifier,
    #[error("unterminated argument of :{0}")]
    UnterminatedArgument(String),
    #[error(":{0} requires an argument")]
    MissingArgument(String),
    #[error(":{0} does not take an argument")]
    UnexpectedArgument(String),
    #[error("invalid argument for :{0}")]
    InvalidArgument(String),
    #[error("pseudo-elements are not supported")]
    PseudoElement,
    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudoClass(String),
    #[error("selectors nested too deeply")]
    TooDeep,
}

/// Parse selector text with an explicit host pseudo-class policy
pub fn parse_selector_list(
    input: &str,
    policy: HostPseudoPolicy,
) -> Result<SelectorList, ParseError> {
    Parser::new(input, 0, policy, 0)?.parse_list()
}

impl FromStr for SelectorList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector_list(s, HostPseudoPolicy::default())
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Offset just past the parsed text
    end: usize,
    policy: HostPseudoPolicy,
    depth: usize,
}

impl Parser {
    fn new(
        input: &str,
        base: usize,
        policy: HostPseudoPolicy,
        depth: usize,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(input, base)?,
            pos: 0,
            end: base + input.len(),
            policy,
            depth,
        })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos)?.kind.clone();
        self.pos += 1;
        Some(token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.offset)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            offset: self.offset(),
            kind,
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(token) => self.error(ParseErrorKind::UnexpectedToken(token.to_string())),
            None => self.error(ParseErrorKind::ExpectedSelector),
        }
    }

    /// Skip whitespace, reporting whether any was present
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek() == Some(&TokenKind::Whitespace) {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn parse_list(&mut self) -> Result<SelectorList, ParseError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(self.error(ParseErrorKind::Empty));
        }

        let mut selectors = vec![self.parse_complex()?];
        while self.peek() == Some(&TokenKind::Delim(',')) {
            self.next();
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
        }
        if self.peek().is_some() {
            return Err(self.unexpected());
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, ParseError> {
        let mut current = match self.parse_compound()? {
            Some(compound) => compound,
            None => {
                return Err(match self.peek() {
                    Some(TokenKind::Delim('>' | '+' | '~')) => {
                        self.error(ParseErrorKind::DanglingCombinator)
                    }
                    Some(TokenKind::Delim(',')) | None => {
                        self.error(ParseErrorKind::ExpectedSelector)
                    }
                    Some(_) => self.unexpected(),
                });
            }
        };

        let mut steps = Vec::new();
        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(TokenKind::Delim(',')) => break,
                Some(TokenKind::Delim('>')) => Combinator::Child,
                Some(TokenKind::Delim('+')) => Combinator::NextSibling,
                Some(TokenKind::Delim('~')) => Combinator::SubsequentSibling,
                _ if had_whitespace => Combinator::Descendant,
                _ => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.next();
                self.skip_whitespace();
            }

            let next = match self.parse_compound()? {
                Some(compound) => compound,
                None if combinator == Combinator::Descendant => return Err(self.unexpected()),
                None => return Err(self.error(ParseErrorKind::DanglingCombinator)),
            };
            steps.push((current, combinator));
            current = next;
        }

        Ok(ComplexSelector {
            steps,
            subject: current,
        })
    }

    /// `None` when no compound starts at the current token
    fn parse_compound(&mut self) -> Result<Option<CompoundSelector>, ParseError> {
        let type_selector = match self.peek() {
            Some(TokenKind::Name {
                value,
                is_ident: true,
            }) => {
                let tag = TypeSelector::Tag(value.clone());
                self.next();
                Some(tag)
            }
            Some(TokenKind::Name { is_ident: false, .. }) => return Err(self.unexpected()),
            Some(TokenKind::Delim('*')) => {
                self.next();
                Some(TypeSelector::Universal)
            }
            _ => None,
        };

        let mut simple = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::Hash(id)) => {
                    simple.push(SimpleSelector::Id(id.clone()));
                    self.next();
                }
                Some(TokenKind::Delim('.')) => {
                    self.next();
                    let class = match self.peek() {
                        Some(TokenKind::Name {
                            value,
                            is_ident: true,
                        }) => value.clone(),
                        _ => return Err(self.error(ParseErrorKind::ExpectedIdentifier)),
                    };
                    self.next();
                    simple.push(SimpleSelector::Class(class));
                }
                Some(TokenKind::Delim('[')) => {
                    simple.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }
                Some(TokenKind::Delim(':')) => {
                    simple.push(SimpleSelector::PseudoClass(self.parse_pseudo_class()?));
                }
                _ => break,
            }
        }

        if type_selector.is_none() && simple.is_empty() {
            return Ok(None);
        }
        Ok(Some(CompoundSelector {
            type_selector: type_selector.unwrap_or(TypeSelector::Universal),
            simple,
        }))
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, ParseError> {
        let open = self.offset();
        let unterminated = ParseError {
            offset: open,
            kind: ParseErrorKind::UnterminatedAttribute,
        };
        self.next();
        self.skip_whitespace();

        let name = match self.peek() {
            Some(TokenKind::Name {
                value,
                is_ident: true,
            }) => value.clone(),
            None => return Err(unterminated),
            Some(_) => return Err(self.error(ParseErrorKind::ExpectedAttributeName)),
        };
        self.next();
        self.skip_whitespace();

        let operator = match self.peek() {
            Some(TokenKind::Delim(']')) => {
                self.next();
                return Ok(AttributeSelector {
                    name,
                    operator: AttributeOperator::Exists,
                    value: String::new(),
                    case: CaseSensitivity::CaseSensitive,
                });
            }
            Some(TokenKind::Delim('=')) => AttributeOperator::Equals,
            Some(TokenKind::Delim(c @ ('~' | '|' | '^' | '$' | '*'))) => {
                let operator = match c {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                };
                self.next();
                if self.peek() != Some(&TokenKind::Delim('=')) {
                    return Err(self.error(ParseErrorKind::InvalidAttributeOperator));
                }
                operator
            }
            None => return Err(unterminated),
            Some(_) => return Err(self.error(ParseErrorKind::InvalidAttributeOperator)),
        };
        self.next();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(TokenKind::Name { value, .. }) | Some(TokenKind::Str(value)) => value.clone(),
            None => return Err(unterminated),
            Some(_) => return Err(self.error(ParseErrorKind::ExpectedAttributeValue)),
        };
        self.next();
        self.skip_whitespace();

        let mut case = CaseSensitivity::CaseSensitive;
        if let Some(TokenKind::Name { value: flag, .. }) = self.peek() {
            case = match flag.to_ascii_lowercase().as_str() {
                "i" => CaseSensitivity::AsciiCaseInsensitive,
                "s" => CaseSensitivity::CaseSensitive,
                _ => return Err(self.error(ParseErrorKind::InvalidAttributeFlag(flag.clone()))),
            };
            self.next();
            self.skip_whitespace();
        }

        match self.peek() {
            Some(TokenKind::Delim(']')) => {
                self.next();
                Ok(AttributeSelector {
                    name,
                    operator,
                    value,
                    case,
                })
            }
            None => Err(unterminated),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, ParseError> {
        let colon = self.offset();
        self.next();
        if !matches!(
            self.peek(),
            Some(TokenKind::Delim(':') | TokenKind::Name { is_ident: true, .. } | TokenKind::Function { .. })
        ) {
            return Err(self.error(ParseErrorKind::ExpectedIdentifier));
        }

        match self.next() {
            Some(TokenKind::Delim(':')) => Err(ParseError {
                offset: colon,
                kind: ParseErrorKind::PseudoElement,
            }),
            Some(TokenKind::Name {
                value,
                is_ident: true,
            }) => {
                let name = value.to_ascii_lowercase();
                let pseudo = match name.as_str() {
                    "root" => PseudoClass::Root,
                    "empty" => PseudoClass::Empty,
                    "first-child" => PseudoClass::FirstChild,
                    "last-child" => PseudoClass::LastChild,
                    "only-child" => PseudoClass::OnlyChild,
                    "first-of-type" => PseudoClass::FirstOfType,
                    "last-of-type" => PseudoClass::LastOfType,
                    "only-of-type" => PseudoClass::OnlyOfType,
                    "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type"
                    | "not" | "is" | "where" | "contains" => {
                        return Err(ParseError {
                            offset: colon,
                            kind: ParseErrorKind::MissingArgument(name),
                        });
                    }
                    _ => return self.host_pseudo_class(colon, name, None),
                };
                Ok(pseudo)
            }
            Some(TokenKind::Function {
                name,
                argument,
                argument_offset,
            }) => {
                let name = name.to_ascii_lowercase();
                self.parse_functional(colon, name, &argument, argument_offset)
            }
            _ => Err(self.error(ParseErrorKind::ExpectedIdentifier)),
        }
    }

    fn parse_functional(
        &mut self,
        colon: usize,
        name: String,
        argument: &str,
        argument_offset: usize,
    ) -> Result<PseudoClass, ParseError> {
        let invalid = |kind| ParseError {
            offset: argument_offset,
            kind,
        };

        match name.as_str() {
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                let expr = NthExpression::parse(argument)
                    .ok_or_else(|| invalid(ParseErrorKind::InvalidArgument(name.clone())))?;
                Ok(match name.as_str() {
                    "nth-child" => PseudoClass::NthChild(expr),
                    "nth-last-child" => PseudoClass::NthLastChild(expr),
                    "nth-of-type" => PseudoClass::NthOfType(expr),
                    _ => PseudoClass::NthLastOfType(expr),
                })
            }
            "not" | "is" | "where" => {
                if self.depth + 1 >= MAX_NESTING {
                    return Err(invalid(ParseErrorKind::TooDeep));
                }
                let list = Parser::new(argument, argument_offset, self.policy, self.depth + 1)?
                    .parse_list()
                    .map_err(|err| match err.kind {
                        ParseErrorKind::Empty => invalid(ParseErrorKind::MissingArgument(name.clone())),
                        _ => err,
                    })?;
                Ok(match name.as_str() {
                    "not" => PseudoClass::Not(list),
                    "is" => PseudoClass::Is(list),
                    _ => PseudoClass::Where(list),
                })
            }
            "contains" => contains_argument(argument, argument_offset)
                .map(PseudoClass::Contains)
                .ok_or_else(|| invalid(ParseErrorKind::InvalidArgument(name.clone()))),
            "root" | "empty" | "first-child" | "last-child" | "only-child" | "first-of-type"
            | "last-of-type" | "only-of-type" => Err(ParseError {
                offset: colon,
                kind: ParseErrorKind::UnexpectedArgument(name),
            }),
            _ => {
                let argument = argument.trim_matches(crate::nth::is_css_whitespace).to_string();
                self.host_pseudo_class(colon, name, Some(argument))
            }
        }
    }

    fn host_pseudo_class(
        &self,
        colon: usize,
        name: String,
        argument: Option<String>,
    ) -> Result<PseudoClass, ParseError> {
        match self.policy {
            HostPseudoPolicy::Delegate => Ok(PseudoClass::Host { name, argument }),
            HostPseudoPolicy::Reject => Err(ParseError {
                offset: colon,
                kind: ParseErrorKind::UnsupportedPseudoClass(name),
            }),
        }
    }
}

/// `:contains()` takes one quoted string or bare text
fn contains_argument(argument: &str, offset: usize) -> Option<String> {
    let trimmed = argument.trim_matches(crate::nth::is_css_whitespace);
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.starts_with(['"', '\'']) {
        return Some(trimmed.to_string());
    }
    let tokens = tokenize(argument, offset).ok()?;
    let mut values = tokens.into_iter().filter(|t| t.kind != TokenKind::Whitespace);
    match (values.next(), values.next()) {
        (
            Some(Token {
                kind: TokenKind::Str(text),
                ..
            }),
            None,
        ) => Some(text),
        _ => None,
    }
}
