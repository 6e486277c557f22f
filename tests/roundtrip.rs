//! Rendering a parsed tree and parsing it again gives the same tree.

use std::collections::HashMap;

use num_bigint::BigUint;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use mba_symbolic::node::Node;
use mba_symbolic::parser::{parse, ParseOptions};

const VARIABLES: [&str; 4] = ["x", "y", "z[1]", "w_2"];

fn random_node(rng: &mut impl Rng, depth: usize) -> Node {
    if depth == 0 || rng.gen_bool(0.25) {
        return if rng.gen_bool(0.5) {
            Node::variable(*VARIABLES.choose(rng).unwrap())
        } else {
            Node::constant(rng.gen_range(-20i64..=300))
        };
    }

    match rng.gen_range(0..7) {
        0 => Node::Sum(random_children(rng, depth - 1)),
        1 => Node::Product(random_children(rng, depth - 1)),
        2 => Node::power(random_node(rng, depth - 1), random_node(rng, depth - 1)),
        3 => Node::negation(random_node(rng, depth - 1)),
        4 => Node::Conjunction(random_children(rng, depth - 1)),
        5 => Node::ExclusiveDisjunction(random_children(rng, depth - 1)),
        _ => Node::InclusiveDisjunction(random_children(rng, depth - 1)),
    }
}

fn random_children(rng: &mut impl Rng, depth: usize) -> Vec<Node> {
    let n = rng.gen_range(2..=3);
    (0..n).map(|_| random_node(&mut *rng, depth)).collect()
}

fn random_assignment(rng: &mut impl Rng) -> HashMap<&'static str, BigUint> {
    VARIABLES
        .iter()
        .map(|&name| (name, BigUint::from(rng.gen::<u64>())))
        .collect()
}

#[test]
fn rendered_trees_reparse_identically() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..300 {
        let node = random_node(&mut rng, 4);
        let text = node.to_string();
        let tree = parse(&text, &ParseOptions::new(8))
            .unwrap_or_else(|e| panic!("cannot parse {:?}: {}", text, e));
        assert_eq!(tree.root(), &node, "{}", text);
    }
}

#[test]
fn reparsed_trees_evaluate_identically() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for bits in [1, 8, 64] {
        let options = ParseOptions::new(bits);
        for _ in 0..100 {
            let original = parse(&random_node(&mut rng, 3).to_string(), &options).unwrap();
            let reparsed = parse(&original.to_string(), &options).unwrap();
            for _ in 0..5 {
                let assignment = random_assignment(&mut rng);
                assert_eq!(
                    original.eval(&assignment),
                    reparsed.eval(&assignment),
                    "{} at {} bits",
                    original,
                    bits
                );
            }
        }
    }
}

#[test]
fn whitespace_is_insignificant() {
    let options = ParseOptions::default();
    let compact = parse("3*(x&~y)-2*(x|y)+(x^y)<<1", &options).unwrap();
    let spaced = parse("  3 * ( x & ~ y ) - 2 * ( x | y ) + ( x ^ y )  <<  1 ", &options).unwrap();
    assert_eq!(compact, spaced);
}
