//! Evaluation of expression trees in the ring of integers modulo `2^w`.
//!
//! Exponents are natural numbers, not ring elements. A non-negative constant exponent
//! is used as written, so `a << 256` is `0` in every ring up to 256 bits. Any other
//! exponent is evaluated in the ring and its residue in `0..2^w` is used.

use std::collections::HashMap;

use log::trace;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::node::{ExprTree, Node};

/// Variable values for evaluation.
pub trait Assignment {
    fn value(&self, name: &str) -> Option<BigUint>;
}

impl Assignment for HashMap<String, BigUint> {
    fn value(&self, name: &str) -> Option<BigUint> {
        self.get(name).cloned()
    }
}

impl Assignment for HashMap<&str, BigUint> {
    fn value(&self, name: &str) -> Option<BigUint> {
        self.get(name).cloned()
    }
}

/// Returns the residue of `value` modulo `modulus`, in `0..modulus`.
pub fn reduce(value: &BigInt, modulus: &BigUint) -> BigUint {
    let r = value.magnitude() % modulus;
    if value.is_negative() && !r.is_zero() {
        modulus - r
    } else {
        r
    }
}

impl ExprTree {
    /// Evaluates the tree modulo `2^bit_width`.
    ///
    /// Returns `None` if some variable has no value.
    pub fn eval(&self, assignment: &impl Assignment) -> Option<BigUint> {
        self.eval_with(|name| assignment.value(name))
    }

    /// Evaluates the tree, looking variable values up through `lookup`.
    ///
    /// Variable values are reduced into the ring before use.
    pub fn eval_with(&self, lookup: impl Fn(&str) -> Option<BigUint>) -> Option<BigUint> {
        let value = eval_node(self.root(), self.modulus(), &lookup)?;
        trace!("eval({}) = {}", self.root(), value);
        Some(value)
    }

    /// Returns a copy of the root with every constant replaced by its ring residue.
    ///
    /// Non-negative constant exponents are kept as written; the result evaluates like
    /// the original tree.
    pub fn reduced_constants(&self) -> Node {
        reduce_node(self.root(), self.modulus())
    }
}

fn eval_node(
    node: &Node,
    modulus: &BigUint,
    lookup: &dyn Fn(&str) -> Option<BigUint>,
) -> Option<BigUint> {
    let value = match node {
        Node::Constant(c) => reduce(c, modulus),
        Node::Variable(name) => lookup(name.as_str())? % modulus,
        Node::Sum(cs) => eval_all(cs, modulus, lookup)?
            .into_iter()
            .fold(BigUint::zero(), |acc, x| (acc + x) % modulus),
        Node::Product(cs) => eval_all(cs, modulus, lookup)?
            .into_iter()
            .fold(BigUint::one() % modulus, |acc, x| (acc * x) % modulus),
        Node::Power(base, exponent) => {
            let base = eval_node(base, modulus, lookup)?;
            let exponent = match literal_exponent(exponent) {
                Some(e) => e.clone(),
                None => eval_node(exponent, modulus, lookup)?,
            };
            base.modpow(&exponent, modulus)
        }
        Node::Negation(child) => {
            let x = eval_node(child, modulus, lookup)?;
            modulus - BigUint::one() - x
        }
        Node::Conjunction(cs) => {
            let mut it = eval_all(cs, modulus, lookup)?.into_iter();
            let first = it.next().unwrap_or_else(|| modulus - BigUint::one());
            it.fold(first, |acc, x| acc & x)
        }
        Node::ExclusiveDisjunction(cs) => eval_all(cs, modulus, lookup)?
            .into_iter()
            .fold(BigUint::zero(), |acc, x| acc ^ x),
        Node::InclusiveDisjunction(cs) => eval_all(cs, modulus, lookup)?
            .into_iter()
            .fold(BigUint::zero(), |acc, x| acc | x),
    };
    Some(value)
}

/// Returns the exponent itself if it is a non-negative constant.
fn literal_exponent(exponent: &Node) -> Option<&BigUint> {
    match exponent {
        Node::Constant(c) if !c.is_negative() => Some(c.magnitude()),
        _ => None,
    }
}

fn eval_all(
    nodes: &[Node],
    modulus: &BigUint,
    lookup: &dyn Fn(&str) -> Option<BigUint>,
) -> Option<Vec<BigUint>> {
    nodes.iter().map(|c| eval_node(c, modulus, lookup)).collect()
}

fn reduce_node(node: &Node, modulus: &BigUint) -> Node {
    match node {
        Node::Constant(c) => Node::Constant(BigInt::from(reduce(c, modulus))),
        Node::Variable(_) => node.clone(),
        Node::Sum(cs) => Node::Sum(reduce_all(cs, modulus)),
        Node::Product(cs) => Node::Product(reduce_all(cs, modulus)),
        Node::Power(base, exponent) => {
            let exponent = match literal_exponent(exponent) {
                Some(_) => exponent.as_ref().clone(),
                None => reduce_node(exponent, modulus),
            };
            Node::power(reduce_node(base, modulus), exponent)
        }
        Node::Negation(child) => Node::negation(reduce_node(child, modulus)),
        Node::Conjunction(cs) => Node::Conjunction(reduce_all(cs, modulus)),
        Node::ExclusiveDisjunction(cs) => Node::ExclusiveDisjunction(reduce_all(cs, modulus)),
        Node::InclusiveDisjunction(cs) => Node::InclusiveDisjunction(reduce_all(cs, modulus)),
    }
}

fn reduce_all(nodes: &[Node], modulus: &BigUint) -> Vec<Node> {
    nodes.iter().map(|c| reduce_node(c, modulus)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::parser::{parse, ParseOptions};

    fn tree(expr: &str, bits: u32) -> ExprTree {
        parse(expr, &ParseOptions::new(bits)).unwrap()
    }

    fn values(pairs: &[(&'static str, u64)]) -> HashMap<&'static str, BigUint> {
        pairs.iter().map(|&(n, v)| (n, BigUint::from(v))).collect()
    }

    fn eval(expr: &str, bits: u32, pairs: &[(&'static str, u64)]) -> Option<u64> {
        tree(expr, bits)
            .eval(&values(pairs))
            .map(|v| u64::try_from(v).unwrap())
    }

    #[test]
    fn test_reduce() {
        let m = BigUint::from(256u32);
        assert_eq!(reduce(&BigInt::from(-1), &m), BigUint::from(255u32));
        assert_eq!(reduce(&BigInt::from(-256), &m), BigUint::zero());
        assert_eq!(reduce(&BigInt::from(300), &m), BigUint::from(44u32));
        assert_eq!(reduce(&BigInt::from(7), &m), BigUint::from(7u32));
    }

    #[test]
    fn test_eval_arithmetic() {
        assert_eq!(eval("x - 3*y", 8, &[("x", 3), ("y", 5)]), Some(244));
        assert_eq!(eval("2**10", 8, &[]), Some(0));
        assert_eq!(eval("x**y", 16, &[("x", 3), ("y", 4)]), Some(81));
        assert_eq!(eval("a << b", 8, &[("a", 3), ("b", 2)]), Some(12));
        assert_eq!(eval("-1", 64, &[]), Some(u64::MAX));
    }

    #[test]
    fn test_eval_large_constant_exponents() {
        // 2^4 vanishes modulo 4 although 4 is 0 modulo 4.
        assert_eq!(eval("2**4", 2, &[]), Some(0));
        assert_eq!(eval("a << 256", 8, &[("a", 3)]), Some(0));
        assert_eq!(eval("a << 64", 64, &[("a", 1)]), Some(0));
        assert_eq!(eval("6**100", 64, &[]), Some(0));
        // Odd bases only depend on the exponent's residue.
        assert_eq!(eval("3**256", 8, &[]), Some(1));
        assert_eq!(eval("x**18446744073709551616", 8, &[("x", 7)]), Some(1));
        // Negative exponents fall back to their residue.
        assert_eq!(eval("3**(-1)", 8, &[]), eval("3**255", 8, &[]));
    }

    fn pow_wrapping(mut base: u64, mut exponent: u64) -> u64 {
        let mut result = 1u64;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.wrapping_mul(base);
            }
            base = base.wrapping_mul(base);
            exponent >>= 1;
        }
        result
    }

    #[test]
    fn test_eval_matches_wrapping_arithmetic() {
        use rand::prelude::*;
        use rand_chacha::ChaCha8Rng;

        type Reference = fn(u64, u64) -> u64;
        let cases: &[(&str, Reference)] = &[
            ("x*y + 3", |x, y| x.wrapping_mul(y).wrapping_add(3)),
            ("x - 5*y", |x, y| x.wrapping_sub(y.wrapping_mul(5))),
            ("~x & y", |x, y| !x & y),
            ("(x ^ y) | 9", |x, y| (x ^ y) | 9),
            ("x << 3", |x, _| x.wrapping_mul(8)),
            ("x << y", |x, y| x.wrapping_mul(pow_wrapping(2, y))),
            ("y << 70", |_, _| 0),
            ("y << 256", |_, _| 0),
            ("2**x", |x, _| pow_wrapping(2, x)),
            ("x**y", pow_wrapping),
            ("(2*x)**64", |_, _| 0),
            ("(2*x + 1)**64", |x, _| pow_wrapping(x.wrapping_mul(2).wrapping_add(1), 64)),
            ("x**18446744073709551616", |x, _| (x & 1 == 1) as u64),
            ("-x**2 + (x & ~y)", |x, y| (x & !y).wrapping_sub(x.wrapping_mul(x))),
        ];

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for bits in [8u32, 64] {
            let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
            for &(expr, reference) in cases {
                let t = tree(expr, bits);
                for _ in 0..50 {
                    // Small values exercise exponents around the bit width.
                    let (x, y) = if rng.gen_bool(0.5) {
                        (rng.gen::<u64>(), rng.gen::<u64>())
                    } else {
                        (rng.gen_range(0..130), rng.gen_range(0..130))
                    };
                    let got = t.eval(&values(&[("x", x), ("y", y)]));
                    let expected = reference(x & mask, y & mask) & mask;
                    assert_eq!(
                        got,
                        Some(BigUint::from(expected)),
                        "{} at {} bits, x = {}, y = {}",
                        expr,
                        bits,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_eval_bitwise() {
        assert_eq!(eval("~x", 8, &[("x", 0)]), Some(255));
        assert_eq!(eval("x & y", 8, &[("x", 12), ("y", 10)]), Some(8));
        assert_eq!(eval("x ^ y", 8, &[("x", 12), ("y", 10)]), Some(6));
        assert_eq!(eval("x | y", 8, &[("x", 12), ("y", 10)]), Some(14));
    }

    #[test]
    fn test_eval_variable_reduced() {
        assert_eq!(eval("x", 4, &[("x", 17)]), Some(1));
    }

    #[test]
    fn test_eval_unbound_variable() {
        assert_eq!(eval("x + y", 8, &[("x", 1)]), None);
    }

    #[test]
    fn test_mba_identity() {
        let lhs = tree("x + y", 4);
        let rhs = tree("(x ^ y) + 2*(x & y)", 4);
        for x in 0..16u64 {
            for y in 0..16u64 {
                let a = values(&[("x", x), ("y", y)]);
                assert_eq!(lhs.eval(&a), rhs.eval(&a), "x = {}, y = {}", x, y);
            }
        }
    }

    #[test]
    fn test_eval_with_closure() {
        let t = tree("x * x", 8);
        let v = t.eval_with(|name| (name == "x").then(|| BigUint::from(20u32)));
        assert_eq!(v, Some(BigUint::from(144u32)));
    }

    #[test]
    fn test_string_keyed_assignment() {
        let mut a: HashMap<String, BigUint> = HashMap::new();
        a.insert("x[1]".to_string(), BigUint::from(2u32));
        assert_eq!(tree("x[1] + 1", 8).eval(&a), Some(BigUint::from(3u32)));
    }

    #[test]
    fn test_reduced_constants_keep_literal_exponents() {
        let t = tree("a << 256", 8);
        let reduced = ExprTree::new(t.reduced_constants(), 8, true);
        assert_eq!(
            reduced.root(),
            &Node::product([
                Node::variable("a"),
                Node::power(Node::constant(2), Node::constant(256)),
            ])
        );
        let a = values(&[("a", 3)]);
        assert_eq!(reduced.eval(&a), t.eval(&a));
    }

    #[test]
    fn test_reduced_constants() {
        let t = tree("300 + -x", 8);
        assert_eq!(
            t.reduced_constants(),
            Node::sum([
                Node::constant(44),
                Node::product([Node::constant(255), Node::variable("x")]),
            ])
        );
    }
}
