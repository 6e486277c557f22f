//! # mba-symbolic: the symbolic core of an MBA simplifier
//!
//! **`mba-symbolic`** turns textual mixed boolean-arithmetic (MBA) expressions into a
//! canonical expression tree, and turns Boolean truth tables into compact
//! disjunctive normal forms.
//!
//! ## Expressions
//!
//! Expressions live in the ring of integers modulo `2^w` for a chosen bit width `w`.
//! The grammar knows the usual arithmetic operators (`+`, `-`, `*`, `**`, `<<`) and the
//! bitwise ones (`~`, `&`, `^`, `|`). Parsing flattens same-precedence chains and folds
//! negations into constants and products on the fly:
//!
//! ```rust
//! use mba_symbolic::node::Node;
//! use mba_symbolic::parser::{parse, ParseOptions};
//!
//! let tree = parse("x - 3*y", &ParseOptions::new(8)).unwrap();
//! assert_eq!(
//!     tree.root(),
//!     &Node::sum([
//!         Node::variable("x"),
//!         Node::product([Node::constant(-3), Node::variable("y")]),
//!     ])
//! );
//! ```
//!
//! ## Truth tables
//!
//! The [`Dnf`][crate::dnf::Dnf] minimizer follows Quine and McCluskey: minterms are
//! bucketed by their number of ones, neighbouring buckets are merged until nothing
//! changes, and a greedy pass drops the redundant prime implicants.
//!
//! ```rust
//! use mba_symbolic::dnf::Dnf;
//!
//! // x | y
//! let dnf = Dnf::new(2, &[0, 1, 1, 1]);
//! assert_eq!(dnf.to_expression_string(&["x", "y"]), "x|y");
//! ```
//!
//! ## Core Components
//!
//! - **[`parser`]**: the expression grammar, options, and the refinement seam.
//! - **[`node`]**: the expression tree, its rendering and its metrics.
//! - **[`eval`]**: evaluation of expression trees modulo `2^w`.
//! - **[`implicant`]** and **[`dnf`]**: the truth-table minimizer.
//! - **[`formula`]**: the formula tree produced by the minimizer.

pub mod bitset;
pub mod dnf;
pub mod error;
pub mod eval;
pub mod formula;
pub mod implicant;
pub mod node;
pub mod parser;
pub mod popcount;
pub mod types;
