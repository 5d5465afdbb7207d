//! An+B expressions for `:nth-*` pseudo-classes

use std::fmt;

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse `odd`, `even`, `B`, `An`, `An+B`, `-n+B` ...
    ///
    /// Whitespace is allowed around the argument and around the sign of B,
    /// nowhere else. Anything else (including overflow) is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim_matches(is_css_whitespace).to_ascii_lowercase();
        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            "" => return None,
            _ => {}
        }

        let Some(n_pos) = s.find('n') else {
            return parse_signed(&s).map(Self::index);
        };

        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            digits => parse_signed(digits)?,
        };

        let rest = s[n_pos + 1..].trim_start_matches(is_css_whitespace);
        if rest.is_empty() {
            return Some(Self::new(a, 0));
        }
        let (sign, digits) = match rest.as_bytes()[0] {
            b'+' => (1, &rest[1..]),
            b'-' => (-1, &rest[1..]),
            _ => return None,
        };
        let digits = digits.trim_start_matches(is_css_whitespace);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let b: i32 = digits.parse().ok()?;
        Some(Self::new(a, sign * b))
    }

    /// Check if position `n` (1-based) is `a*k + b` for some k >= 0
    pub fn matches(&self, n: usize) -> bool {
        let Ok(n) = i64::try_from(n) else {
            return false;
        };
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        if a == 0 {
            return n == b;
        }
        let diff = n - b;
        diff % a == 0 && diff / a >= 0
    }
}

impl fmt::Display for NthExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, b) => write!(f, "{}", b),
            (a, 0) => write!(f, "{}n", a),
            (a, b) => write!(f, "{}n{:+}", a, b),
        }
    }
}

/// Optional sign followed by ASCII digits only
fn parse_signed(s: &str) -> Option<i32> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub(crate) fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}
