//! Formula trees produced by the minimizer.
//!
//! A [`Formula`] is a Boolean formula over variables addressed by index.
//! Variable `i` takes its value from bit `i` of an assignment, the same
//! convention the truth vector uses for its indices.

use std::fmt;

use crate::node::Node;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Formula {
    /// `Const(true)` is a tautology, `Const(false)` has no satisfying assignment.
    Const(bool),
    /// A possibly negated variable.
    Literal { var: usize, negated: bool },
    /// Conjunction of at least two formulas.
    And(Vec<Formula>),
    /// Inclusive disjunction of at least two formulas.
    Or(Vec<Formula>),
}

impl Formula {
    pub fn literal(var: usize, negated: bool) -> Self {
        Formula::Literal { var, negated }
    }

    /// Builds a conjunction, collapsing the empty and single-operand cases.
    pub fn and(mut operands: Vec<Formula>) -> Self {
        match operands.len() {
            0 => Formula::Const(true),
            1 => operands.pop().unwrap_or(Formula::Const(true)),
            _ => Formula::And(operands),
        }
    }

    /// Builds a disjunction, collapsing the empty and single-operand cases.
    pub fn or(mut operands: Vec<Formula>) -> Self {
        match operands.len() {
            0 => Formula::Const(false),
            1 => operands.pop().unwrap_or(Formula::Const(false)),
            _ => Formula::Or(operands),
        }
    }

    /// Evaluates the formula; bit `i` of `assignment` is the value of variable `i`.
    pub fn eval(&self, assignment: u64) -> bool {
        match self {
            Formula::Const(value) => *value,
            Formula::Literal { var, negated } => ((assignment >> var) & 1 == 1) != *negated,
            Formula::And(operands) => operands.iter().all(|f| f.eval(assignment)),
            Formula::Or(operands) => operands.iter().any(|f| f.eval(assignment)),
        }
    }

    /// Converts the formula into an expression tree over the given variable names.
    ///
    /// Constants become `-1` (all ones) and `0`, so the result evaluates to the formula
    /// in every bit of the ring.
    ///
    /// # Panics
    ///
    /// Panics if a literal refers to a variable without a name.
    pub fn to_node<S: AsRef<str>>(&self, names: &[S]) -> Node {
        match self {
            Formula::Const(true) => Node::constant(-1),
            Formula::Const(false) => Node::constant(0),
            Formula::Literal { var, negated } => {
                assert!(
                    *var < names.len(),
                    "No name given for variable {} ({} names)",
                    var,
                    names.len()
                );
                let v = Node::variable(names[*var].as_ref());
                if *negated {
                    Node::negation(v)
                } else {
                    v
                }
            }
            Formula::And(operands) => {
                Node::Conjunction(operands.iter().map(|f| f.to_node(names)).collect())
            }
            Formula::Or(operands) => {
                Node::InclusiveDisjunction(operands.iter().map(|f| f.to_node(names)).collect())
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Const(true) => write!(f, "1"),
            Formula::Const(false) => write!(f, "0"),
            Formula::Literal { var, negated } => {
                if *negated {
                    write!(f, "~")?;
                }
                write!(f, "x{}", var)
            }
            Formula::And(operands) | Formula::Or(operands) => {
                let op = if matches!(self, Formula::And(_)) { " & " } else { " | " };
                write!(f, "(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", op)?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
        }
    }
}
