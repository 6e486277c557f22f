//! Parsing of MBA expressions.
//!
//! Parsing proceeds in a single left-to-right pass, one grammar rule per precedence
//! level, from the loosest-binding operator to the tightest:
//!
//! ```text
//! or      := xor ('|' xor)*
//! xor     := and ('^' and)*
//! and     := shift ('&' shift)*
//! shift   := sum ('<<' sum)?
//! sum     := product (('+' | '-') product)*
//! product := factor ('*' factor)*
//! factor  := '~' factor | '-' factor | power
//! power   := terminal ('**' terminal)?
//! terminal:= '(' or ')' | variable | constant
//! ```
//!
//! Each rule takes a [`Cursor`] and returns the parsed node together with the advanced
//! cursor, so rules can be invoked in isolation. Whitespace is skipped after every
//! consumed token.
//!
//! Chains of one operator become a single n-ary node, and a chain with a single operand
//! is just that operand. Subtraction and unary minus multiply by `-1` on the spot (see
//! [`Node::negate`]). `a << b` becomes `a * 2**b`. Neither `<<` nor `**` may be chained
//! without parentheses.

use log::{debug, trace};
use num_bigint::BigInt;

use crate::error::{ConfigError, ParseError, SyntaxError, SyntaxErrorKind};
use crate::node::{ExprTree, Node};

/// Options controlling how an expression is parsed and post-processed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ParseOptions {
    /// Expressions live in the ring of integers modulo `2^bit_width`.
    pub bit_width: u32,
    /// Carried on the tree for passes that reduce constants into the ring.
    pub reduce_constants: bool,
    /// Run the refinement stage after parsing.
    pub refine: bool,
    /// Mark linear subexpressions after refinement.
    pub mark_linear: bool,
}

impl ParseOptions {
    pub fn new(bit_width: u32) -> Self {
        Self {
            bit_width,
            reduce_constants: true,
            refine: false,
            mark_linear: false,
        }
    }

    pub fn with_reduce_constants(mut self, reduce_constants: bool) -> Self {
        self.reduce_constants = reduce_constants;
        self
    }

    pub fn with_refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    pub fn with_mark_linear(mut self, mark_linear: bool) -> Self {
        self.mark_linear = mark_linear;
        self
    }

    /// Checks the options for combinations that can never succeed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bit_width == 0 {
            return Err(ConfigError::ZeroBitWidth);
        }
        if self.mark_linear && !self.refine {
            return Err(ConfigError::MarkLinearWithoutRefine);
        }
        Ok(())
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::new(64)
    }
}

/// Post-processing stages applied to a freshly parsed tree.
pub trait Refine {
    /// Brings the tree into refined normal form.
    fn refine(&mut self, tree: &mut ExprTree);

    /// Marks linear subexpressions of a refined tree.
    fn mark_linear(&mut self, tree: &mut ExprTree);
}

/// A [`Refine`] implementation that leaves the tree untouched.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoRefinement;

impl Refine for NoRefinement {
    fn refine(&mut self, _tree: &mut ExprTree) {
        debug!("refine requested, but no refinement stage is installed");
    }

    fn mark_linear(&mut self, _tree: &mut ExprTree) {
        debug!("mark_linear requested, but no refinement stage is installed");
    }
}

/// Parses `expr` using the given options.
///
/// Refinement requests are forwarded to [`NoRefinement`]; use [`parse_with`] to plug in
/// a real stage.
pub fn parse(expr: &str, options: &ParseOptions) -> Result<ExprTree, ParseError> {
    parse_with(expr, options, &mut NoRefinement)
}

/// Parses `expr` and runs the requested refinement stages of `refiner` on the result.
///
/// Options are validated before the input is looked at.
pub fn parse_with<R: Refine>(
    expr: &str,
    options: &ParseOptions,
    refiner: &mut R,
) -> Result<ExprTree, ParseError> {
    options.validate()?;
    debug!("parse(expr = {:?}, bit_width = {})", expr, options.bit_width);

    let root = parse_expression(expr)?;
    let mut tree = ExprTree::new(root, options.bit_width, options.reduce_constants);

    if options.refine {
        refiner.refine(&mut tree);
    }
    if options.mark_linear {
        refiner.mark_linear(&mut tree);
    }
    Ok(tree)
}

/// Parses a whole expression into a bare node.
pub fn parse_expression(expr: &str) -> Result<Node, SyntaxError> {
    let cur = Cursor::new(expr).skip_whitespace();
    let (root, cur) = inclusive_disjunction(cur)?;
    if !cur.at_end() {
        let kind = if cur.peek() == Some(')') {
            SyntaxErrorKind::UnmatchedParenthesis
        } else {
            SyntaxErrorKind::TrailingInput
        };
        return Err(cur.error(kind));
    }
    Ok(root)
}

/// A read position in the source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte offset of the next character.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Steps over the next character without skipping whitespace.
    pub fn advance(self) -> Self {
        match self.peek() {
            Some(c) => Self {
                src: self.src,
                pos: self.pos + c.len_utf8(),
            },
            None => self,
        }
    }

    /// Steps over the next character and any whitespace after it.
    pub fn bump(self) -> Self {
        self.advance().skip_whitespace()
    }

    pub fn skip_whitespace(self) -> Self {
        let trimmed = self.rest().trim_start_matches(|c: char| c.is_ascii_whitespace());
        Self {
            src: self.src,
            pos: self.src.len() - trimmed.len(),
        }
    }

    /// Steps over characters while `pred` holds and returns the consumed slice.
    fn take_while(self, pred: impl Fn(char) -> bool) -> (&'a str, Self) {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        let next = Self {
            src: self.src,
            pos: self.pos + len,
        };
        (&rest[..len], next)
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.pos, self.peek())
    }

    fn has(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    fn has_pair(&self, first: char, second: char) -> bool {
        self.peek() == Some(first) && self.peek_next() == Some(second)
    }

    fn has_multiplicator(&self) -> bool {
        self.has('*') && self.peek_next() != Some('*')
    }

    fn has_power(&self) -> bool {
        self.has_pair('*', '*')
    }

    fn has_lshift(&self) -> bool {
        self.has_pair('<', '<')
    }
}

/// Result of a grammar rule: the node and the cursor behind it.
pub type Parsed<'a> = Result<(Node, Cursor<'a>), SyntaxError>;

/// Parses `operand (op operand)*` into a single n-ary node built by `build`.
fn chain<'a>(
    cur: Cursor<'a>,
    op: char,
    operand: fn(Cursor<'a>) -> Parsed<'a>,
    build: fn(Vec<Node>) -> Node,
) -> Parsed<'a> {
    let (first, mut cur) = operand(cur)?;
    // A trivial chain needs no dedicated node.
    if !cur.has(op) {
        return Ok((first, cur));
    }

    let mut children = vec![first];
    while cur.has(op) {
        let (child, next) = operand(cur.bump())?;
        children.push(child);
        cur = next;
    }
    Ok((build(children), cur))
}

pub fn inclusive_disjunction(cur: Cursor<'_>) -> Parsed<'_> {
    chain(cur, '|', exclusive_disjunction, Node::InclusiveDisjunction)
}

pub fn exclusive_disjunction(cur: Cursor<'_>) -> Parsed<'_> {
    chain(cur, '^', conjunction, Node::ExclusiveDisjunction)
}

pub fn conjunction(cur: Cursor<'_>) -> Parsed<'_> {
    chain(cur, '&', shift, Node::Conjunction)
}

/// `a << b` is written as `a * 2**b`.
pub fn shift(cur: Cursor<'_>) -> Parsed<'_> {
    let (base, cur) = sum(cur)?;
    if !cur.has_lshift() {
        return Ok((base, cur));
    }

    let (amount, cur) = sum(cur.advance().bump())?;
    if cur.has_lshift() {
        return Err(cur.error(SyntaxErrorKind::NestedShift));
    }

    let node = Node::product([base, Node::power(Node::constant(2), amount)]);
    Ok((node, cur))
}

pub fn sum(cur: Cursor<'_>) -> Parsed<'_> {
    let (first, mut cur) = product(cur)?;
    if !cur.has('+') && !cur.has('-') {
        return Ok((first, cur));
    }

    let mut children = vec![first];
    while cur.has('+') || cur.has('-') {
        let negative = cur.has('-');
        let (child, next) = product(cur.bump())?;
        children.push(if negative { child.negate() } else { child });
        cur = next;
    }
    Ok((Node::Sum(children), cur))
}

pub fn product(cur: Cursor<'_>) -> Parsed<'_> {
    let (first, mut cur) = factor(cur)?;
    if !cur.has_multiplicator() {
        return Ok((first, cur));
    }

    let mut children = vec![first];
    while cur.has_multiplicator() {
        let (child, next) = factor(cur.bump())?;
        children.push(child);
        cur = next;
    }
    Ok((Node::Product(children), cur))
}

pub fn factor(cur: Cursor<'_>) -> Parsed<'_> {
    if cur.has('~') {
        let (child, cur) = factor(cur.bump())?;
        return Ok((Node::negation(child), cur));
    }
    if cur.has('-') {
        let (child, cur) = factor(cur.bump())?;
        return Ok((child.negate(), cur));
    }
    power(cur)
}

pub fn power(cur: Cursor<'_>) -> Parsed<'_> {
    let (base, cur) = terminal(cur)?;
    if !cur.has_power() {
        return Ok((base, cur));
    }

    let (exponent, cur) = terminal(cur.advance().bump())?;
    if cur.has_power() {
        return Err(cur.error(SyntaxErrorKind::NestedPower));
    }
    Ok((Node::power(base, exponent), cur))
}

pub fn terminal(cur: Cursor<'_>) -> Parsed<'_> {
    if cur.has('(') {
        let (node, cur) = inclusive_disjunction(cur.bump())?;
        if !cur.has(')') {
            return Err(cur.error(SyntaxErrorKind::UnmatchedParenthesis));
        }
        return Ok((node, cur.bump()));
    }

    match cur.peek() {
        Some(c) if c.is_ascii_alphabetic() => variable(cur),
        _ => constant(cur),
    }
}

/// A letter followed by letters, digits and underscores, optionally indexed: `x_1[4]`.
pub fn variable(cur: Cursor<'_>) -> Parsed<'_> {
    let start = cur;
    let (_, mut cur) = cur
        .advance()
        .take_while(|c| c.is_ascii_alphanumeric() || c == '_');

    if cur.has('[') {
        let (digits, next) = cur.advance().take_while(|c| c.is_ascii_digit());
        if digits.is_empty() || !next.has(']') {
            return Err(next.error(SyntaxErrorKind::MalformedIndex));
        }
        cur = next.advance();
    }

    let name = &start.src[start.pos..cur.pos];
    trace!("variable {:?} at {}", name, start.pos);
    Ok((Node::variable(name), cur.skip_whitespace()))
}

/// A decimal, `0b` binary or `0x` hexadecimal literal.
pub fn constant(cur: Cursor<'_>) -> Parsed<'_> {
    if cur.has_pair('0', 'b') {
        return digits(cur.advance().advance(), 2, |c| c == '0' || c == '1');
    }
    if cur.has_pair('0', 'x') {
        return digits(cur.advance().advance(), 16, |c| c.is_ascii_hexdigit());
    }
    match cur.peek() {
        Some(c) if c.is_ascii_digit() => digits(cur, 10, |c| c.is_ascii_digit()),
        _ => Err(cur.error(SyntaxErrorKind::UnexpectedCharacter)),
    }
}

fn digits(cur: Cursor<'_>, radix: u32, is_digit: fn(char) -> bool) -> Parsed<'_> {
    let (run, next) = cur.take_while(is_digit);
    if run.is_empty() {
        return Err(cur.error(SyntaxErrorKind::InvalidDigit { radix }));
    }
    let value = BigInt::parse_bytes(run.as_bytes(), radix)
        .ok_or_else(|| cur.error(SyntaxErrorKind::InvalidDigit { radix }))?;
    Ok((Node::Constant(value), next.skip_whitespace()))
}
