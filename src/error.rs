//! Error types for expression parsing.

use std::fmt;

/// What went wrong while reading an expression.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SyntaxErrorKind {
    /// A variable, constant or `(` was expected.
    UnexpectedCharacter,
    /// A `(` without its `)`, or a `)` without its `(`.
    UnmatchedParenthesis,
    /// A `0b` or `0x` prefix not followed by a digit of that radix.
    InvalidDigit { radix: u32 },
    /// A variable index such as `x[` without digits or without the closing `]`.
    MalformedIndex,
    /// `a << b << c` without parentheses.
    NestedShift,
    /// `a ** b ** c` without parentheses.
    NestedPower,
    /// The expression ended before the input did.
    TrailingInput,
}

/// A syntax error at a byte offset of the input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Byte offset into the input.
    pub position: usize,
    /// The character at `position`, or `None` at the end of the input.
    pub found: Option<char>,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: usize, found: Option<char>) -> Self {
        Self {
            kind,
            position,
            found,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SyntaxErrorKind::UnexpectedCharacter => write!(f, "expected operand")?,
            SyntaxErrorKind::UnmatchedParenthesis => write!(f, "unmatched parenthesis")?,
            SyntaxErrorKind::InvalidDigit { radix: 2 } => write!(f, "invalid binary digit")?,
            SyntaxErrorKind::InvalidDigit { radix: 16 } => write!(f, "invalid hex digit")?,
            SyntaxErrorKind::InvalidDigit { radix } => write!(f, "invalid base-{} digit", radix)?,
            SyntaxErrorKind::MalformedIndex => write!(f, "malformed variable index")?,
            SyntaxErrorKind::NestedShift => write!(f, "disallowed nested lshift operator")?,
            SyntaxErrorKind::NestedPower => write!(f, "disallowed nested power operator")?,
            SyntaxErrorKind::TrailingInput => {
                write!(f, "finished before everything was parsed")?
            }
        }
        match self.found {
            Some(c) => write!(f, " near {:?} at position {}", c, self.position),
            None => write!(f, " at end of input (position {})", self.position),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Invalid combinations of parser options.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConfigError {
    /// The ring `Z/2^0` is not supported.
    ZeroBitWidth,
    /// Linear subexpressions can only be marked on a refined tree.
    MarkLinearWithoutRefine,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBitWidth => write!(f, "bit width must be positive"),
            ConfigError::MarkLinearWithoutRefine => {
                write!(f, "refine before marking linear subexpressions")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by [`parse`][crate::parser::parse].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    Syntax(SyntaxError),
    Configuration(ConfigError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(e) => write!(f, "syntax error: {}", e),
            ParseError::Configuration(e) => write!(f, "configuration error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Syntax(e) => Some(e),
            ParseError::Configuration(e) => Some(e),
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Configuration(err)
    }
}
