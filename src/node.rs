//! Expression trees over the ring of integers modulo `2^w`.
//!
//! A [`Node`] is one of nine kinds. Constants and variables are leaves; sums,
//! products and the three bitwise connectives are n-ary; powers are binary and
//! negation (bitwise complement) is unary. Trees built by the parser never contain
//! an n-ary node with fewer than two children.
//!
//! An [`ExprTree`] owns a root node together with the ring it lives in.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed};

/// The kind of a [`Node`], without its payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Constant,
    Variable,
    Sum,
    Product,
    Power,
    Negation,
    Conjunction,
    ExclusiveDisjunction,
    InclusiveDisjunction,
}

impl NodeKind {
    /// Sums, products and powers.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, NodeKind::Sum | NodeKind::Product | NodeKind::Power)
    }

    /// Negation and the three bitwise connectives.
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            NodeKind::Negation
                | NodeKind::Conjunction
                | NodeKind::ExclusiveDisjunction
                | NodeKind::InclusiveDisjunction
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Node {
    /// An unreduced integer literal.
    Constant(BigInt),
    /// A variable, possibly with a bracketed index such as `x[3]`.
    Variable(String),
    Sum(Vec<Node>),
    Product(Vec<Node>),
    /// `base ** exponent`
    Power(Box<Node>, Box<Node>),
    /// Bitwise complement.
    Negation(Box<Node>),
    Conjunction(Vec<Node>),
    ExclusiveDisjunction(Vec<Node>),
    InclusiveDisjunction(Vec<Node>),
}

impl Node {
    pub fn constant(value: impl Into<BigInt>) -> Self {
        Node::Constant(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable(name.into())
    }

    pub fn sum(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Sum(children.into_iter().collect())
    }

    pub fn product(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Product(children.into_iter().collect())
    }

    pub fn power(base: Node, exponent: Node) -> Self {
        Node::Power(Box::new(base), Box::new(exponent))
    }

    pub fn negation(child: Node) -> Self {
        Node::Negation(Box::new(child))
    }

    pub fn conjunction(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Conjunction(children.into_iter().collect())
    }

    pub fn exclusive_disjunction(children: impl IntoIterator<Item = Node>) -> Self {
        Node::ExclusiveDisjunction(children.into_iter().collect())
    }

    pub fn inclusive_disjunction(children: impl IntoIterator<Item = Node>) -> Self {
        Node::InclusiveDisjunction(children.into_iter().collect())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Constant(_) => NodeKind::Constant,
            Node::Variable(_) => NodeKind::Variable,
            Node::Sum(_) => NodeKind::Sum,
            Node::Product(_) => NodeKind::Product,
            Node::Power(_, _) => NodeKind::Power,
            Node::Negation(_) => NodeKind::Negation,
            Node::Conjunction(_) => NodeKind::Conjunction,
            Node::ExclusiveDisjunction(_) => NodeKind::ExclusiveDisjunction,
            Node::InclusiveDisjunction(_) => NodeKind::InclusiveDisjunction,
        }
    }

    /// Returns the children in order; empty for leaves.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Constant(_) | Node::Variable(_) => Vec::new(),
            Node::Power(base, exponent) => vec![base.as_ref(), exponent.as_ref()],
            Node::Negation(child) => vec![child.as_ref()],
            Node::Sum(cs)
            | Node::Product(cs)
            | Node::Conjunction(cs)
            | Node::ExclusiveDisjunction(cs)
            | Node::InclusiveDisjunction(cs) => cs.iter().collect(),
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn count_nodes(&self) -> usize {
        1 + self.children().iter().map(|c| c.count_nodes()).sum::<usize>()
    }

    /// Number of parent/child edges joining an arithmetic and a bitwise operator.
    pub fn alternation(&self) -> usize {
        let kind = self.kind();
        self.children()
            .iter()
            .map(|c| {
                let ck = c.kind();
                let alternates = (kind.is_arithmetic() && ck.is_bitwise())
                    || (kind.is_bitwise() && ck.is_arithmetic());
                alternates as usize + c.alternation()
            })
            .sum()
    }

    /// Appends the names of variables not seen yet, in pre-order.
    pub fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Node::Variable(name) = self {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
            return;
        }
        for c in self.children() {
            c.collect_variables(out);
        }
    }

    /// Multiplies the node by `-1`, folding into constants and products.
    ///
    /// A constant is negated; a product starting with a constant gets that constant
    /// negated; any other product gets a leading `-1`; every other node is wrapped
    /// into a product with `-1`.
    pub fn negate(self) -> Node {
        match self {
            Node::Constant(c) => Node::Constant(-c),
            Node::Product(mut children) => {
                if let Some(Node::Constant(c)) = children.first_mut() {
                    *c = -std::mem::take(c);
                } else {
                    children.insert(0, Node::constant(-1));
                }
                Node::Product(children)
            }
            other => Node::Product(vec![Node::constant(-1), other]),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Node], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

/// Renders the node as fully parenthesized text that parses back to an equivalent tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(c) if c.is_negative() => write!(f, "({})", c),
            Node::Constant(c) => write!(f, "{}", c),
            Node::Variable(name) => write!(f, "{}", name),
            Node::Sum(cs) => write_joined(f, cs, "+"),
            Node::Product(cs) => write_joined(f, cs, "*"),
            Node::Power(base, exponent) => write!(f, "({}**{})", base, exponent),
            Node::Negation(child) => write!(f, "(~{})", child),
            Node::Conjunction(cs) => write_joined(f, cs, "&"),
            Node::ExclusiveDisjunction(cs) => write_joined(f, cs, "^"),
            Node::InclusiveDisjunction(cs) => write_joined(f, cs, "|"),
        }
    }
}

/// A parsed expression together with the ring it lives in.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExprTree {
    root: Node,
    bit_width: u32,
    modulus: BigUint,
    reduce_constants: bool,
}

impl ExprTree {
    /// Wraps a root node for the ring of integers modulo `2^bit_width`.
    ///
    /// # Panics
    ///
    /// Panics if `bit_width == 0`.
    pub fn new(root: Node, bit_width: u32, reduce_constants: bool) -> Self {
        assert!(bit_width > 0, "Bit width must be positive");
        Self {
            root,
            bit_width,
            modulus: BigUint::one() << bit_width,
            reduce_constants,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Returns `2^bit_width`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Whether later passes should reduce constants modulo `2^bit_width`.
    pub fn reduces_constants(&self) -> bool {
        self.reduce_constants
    }

    /// Distinct variable names in order of first occurrence.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.collect_variables(&mut out);
        out
    }

    pub fn count_nodes(&self) -> usize {
        self.root.count_nodes()
    }

    pub fn alternation(&self) -> usize {
        self.root.alternation()
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
