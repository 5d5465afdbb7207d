//! Selector tokenizer
//!
//! Splits selector text into names, hashes, strings, delimiters and
//! whitespace runs. CSS escapes are resolved here, so the parser only sees
//! decoded values. Functional pseudo-class arguments are captured as raw
//! balanced text; the parser decides how to read them.

use std::fmt;

use crate::nth::is_css_whitespace;
use crate::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset in the full selector text
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Run of name characters; `is_ident` is false when it starts with a digit
    Name { value: String, is_ident: bool },
    /// `#name`
    Hash(String),
    /// Quoted string, quotes removed
    Str(String),
    /// `name(...)` with the text between the parentheses
    Function {
        name: String,
        argument: String,
        argument_offset: usize,
    },
    Delim(char),
    Whitespace,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { value, .. } => write!(f, "{}", value),
            Self::Hash(value) => write!(f, "#{}", value),
            Self::Str(value) => write!(f, "{:?}", value),
            Self::Function { name, .. } => write!(f, "{}(", name),
            Self::Delim(c) => write!(f, "{}", c),
            Self::Whitespace => f.write_str("whitespace"),
        }
    }
}

/// Tokenize `input`; offsets are shifted by `base`
pub(crate) fn tokenize(input: &str, base: usize) -> Result<Vec<Token>, ParseError> {
    let mut tokenizer = Tokenizer { input, pos: 0, base };
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    base: usize,
}

impl Tokenizer<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
        ParseError {
            offset: self.base + offset,
            kind,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            let start = self.pos;
            let Some(c) = self.peek() else {
                return Ok(None);
            };

            let kind = if is_css_whitespace(c) {
                while self.peek().is_some_and(is_css_whitespace) {
                    self.bump();
                }
                TokenKind::Whitespace
            } else if c == '/' && self.peek_at(1) == Some('*') {
                self.skip_comment();
                continue;
            } else if c == '"' || c == '\'' {
                TokenKind::Str(self.consume_string()?)
            } else if c == '#' && self.starts_name_char(1) {
                self.bump();
                TokenKind::Hash(self.consume_name())
            } else if self.starts_ident(0) || c.is_ascii_digit() {
                let is_ident = !c.is_ascii_digit();
                let value = self.consume_name();
                if is_ident && self.peek() == Some('(') {
                    self.bump();
                    let argument_offset = self.pos;
                    let argument = self.consume_argument(&value, start)?;
                    TokenKind::Function {
                        name: value,
                        argument,
                        argument_offset: self.base + argument_offset,
                    }
                } else {
                    TokenKind::Name { value, is_ident }
                }
            } else {
                self.bump();
                TokenKind::Delim(c)
            };

            return Ok(Some(Token {
                kind,
                offset: self.base + start,
            }));
        }
    }

    fn skip_comment(&mut self) {
        self.pos += 2;
        match self.input[self.pos..].find("*/") {
            Some(end) => self.pos += end + 2,
            None => self.pos = self.input.len(),
        }
    }

    /// `\` not followed by a newline, `n` chars ahead
    fn is_valid_escape(&self, n: usize) -> bool {
        self.peek_at(n) == Some('\\') && !matches!(self.peek_at(n + 1), Some('\n' | '\r' | '\x0C'))
    }

    fn starts_name_char(&self, n: usize) -> bool {
        match self.peek_at(n) {
            Some(c) if is_name_char(c) => true,
            _ => self.is_valid_escape(n),
        }
    }

    fn starts_ident(&self, n: usize) -> bool {
        match self.peek_at(n) {
            Some('-') => {
                matches!(self.peek_at(n + 1), Some(c) if is_name_start(c) || c == '-')
                    || self.is_valid_escape(n + 1)
            }
            Some(c) if is_name_start(c) => true,
            _ => self.is_valid_escape(n),
        }
    }

    fn consume_name(&mut self) -> String {
        let mut out = String::new();
        loop {
            match self.peek() {
                Some(c) if is_name_char(c) => {
                    self.bump();
                    out.push(c);
                }
                Some('\\') if self.is_valid_escape(0) => {
                    self.bump();
                    out.push(self.consume_escape());
                }
                _ => return out,
            }
        }
    }

    /// Decode an escape; the backslash is already consumed
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.bump() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }
        let mut code = c.to_digit(16).unwrap_or(0);
        for _ in 0..5 {
            match self.peek().and_then(|h| h.to_digit(16)) {
                Some(d) => {
                    self.bump();
                    code = code * 16 + d;
                }
                None => break,
            }
        }
        if self.peek() == Some('\r') && self.peek_at(1) == Some('\n') {
            self.pos += 2;
        } else if self.peek().is_some_and(is_css_whitespace) {
            self.bump();
        }
        match char::from_u32(code) {
            Some('\0') | None => char::REPLACEMENT_CHARACTER,
            Some(ch) => ch,
        }
    }

    fn consume_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let quote = self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(start, ParseErrorKind::UnterminatedString)),
                Some(c) if Some(c) == quote => return Ok(out),
                Some('\n' | '\r' | '\x0C') => {
                    return Err(self.error(start, ParseErrorKind::UnterminatedString));
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n' | '\x0C') => {
                        self.bump();
                    }
                    Some('\r') => {
                        self.bump();
                        if self.peek() == Some('\n') {
                            self.bump();
                        }
                    }
                    Some(_) => out.push(self.consume_escape()),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Raw text up to the matching `)`, which is consumed
    fn consume_argument(&mut self, name: &str, start: usize) -> Result<String, ParseError> {
        let arg_start = self.pos;
        let mut depth = 0usize;
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(
                    start,
                    ParseErrorKind::UnterminatedArgument(name.to_ascii_lowercase()),
                ));
            };
            match c {
                '(' => {
                    depth += 1;
                    self.bump();
                }
                ')' if depth == 0 => {
                    let argument = self.input[arg_start..self.pos].to_string();
                    self.bump();
                    return Ok(argument);
                }
                ')' => {
                    depth -= 1;
                    self.bump();
                }
                '"' | '\'' => {
                    self.consume_string()?;
                }
                '\\' => {
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}
