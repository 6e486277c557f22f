//! Quine-McCluskey minimization of truth tables.
//!
//! # Algorithm
//!
//! 1. Every true entry of the truth vector becomes an [`Implicant`], placed in the
//!    bucket given by its number of ones.
//! 2. In each round, implicants from neighbouring buckets `k` and `k + 1` are merged
//!    pairwise. The merge results form the next generation; implicants that took part
//!    in no merge are prime and get recorded in discovery order. A round without any
//!    merge ends the loop, which happens after at most `v + 1` rounds since every
//!    generation carries one more don't-care slot than the previous one.
//! 3. A single greedy pass over the primes keeps those that cover a minterm no earlier
//!    kept prime covers. The result is a cover, but not necessarily a minimum one.
//!
//! The minimizer is exponential in the number of variables; callers are expected to
//! bound `v` themselves.

use std::fmt;

use log::{debug, trace};

use crate::bitset::MintermSet;
use crate::formula::Formula;
use crate::implicant::Implicant;
use crate::popcount::popcount;

/// One generation of implicants, bucketed by their number of ones.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Generation {
    buckets: Vec<Vec<Implicant>>,
}

impl Generation {
    /// Builds the initial generation from a truth vector, one implicant per true entry.
    ///
    /// # Panics
    ///
    /// Panics if the vector has more than `2^vnumber` entries.
    pub fn from_truth_vector(vnumber: usize, truth: &[u8]) -> Self {
        let mut buckets = vec![Vec::new(); vnumber + 1];
        for (i, &bit) in truth.iter().enumerate() {
            if bit == 1 {
                let ones = popcount(i as u64) as usize;
                buckets[ones].push(Implicant::new(vnumber, i as u32));
            }
        }
        Self { buckets }
    }

    fn empty(vnumber: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); vnumber + 1],
        }
    }

    /// Returns the implicants with exactly `ones` one-slots.
    pub fn bucket(&self, ones: usize) -> &[Implicant] {
        &self.buckets[ones]
    }

    /// Returns the total number of implicants.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Adds an implicant to its bucket unless an equal one is already there.
    fn insert(&mut self, implicant: Implicant) {
        let bucket = &mut self.buckets[implicant.count_ones()];
        if !bucket.contains(&implicant) {
            bucket.push(implicant);
        }
    }
}

/// Outcome of one merge round.
#[derive(Debug)]
pub struct Round {
    /// Implicants produced by merging, to be processed by the next round.
    pub next: Generation,
    /// Implicants of the consumed generation that took part in no merge.
    pub primes: Vec<Implicant>,
    /// Number of successful merges.
    pub merges: usize,
}

/// Runs a single merge round over an immutable generation.
pub fn merge_round(current: &Generation) -> Round {
    let num_buckets = current.buckets.len();
    let mut next = Generation::empty(num_buckets.saturating_sub(1));
    let mut merged: Vec<Vec<bool>> = current
        .buckets
        .iter()
        .map(|bucket| vec![false; bucket.len()])
        .collect();
    let mut merges = 0;

    for k in 0..num_buckets.saturating_sub(1) {
        for (i, a) in current.buckets[k].iter().enumerate() {
            for (j, b) in current.buckets[k + 1].iter().enumerate() {
                if let Some(m) = a.try_merge(b) {
                    trace!("merge {} + {} => {}", a, b, m);
                    merged[k][i] = true;
                    merged[k + 1][j] = true;
                    merges += 1;
                    next.insert(m);
                }
            }
        }
    }

    let primes = current
        .buckets
        .iter()
        .zip(&merged)
        .flat_map(|(bucket, marks)| {
            bucket
                .iter()
                .zip(marks)
                .filter(|&(_, &was_merged)| !was_merged)
                .map(|(imp, _)| imp.clone())
        })
        .collect();

    Round {
        next,
        primes,
        merges,
    }
}

/// A disjunctive normal form computed from a truth vector.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Dnf {
    vnumber: usize,
    primes: Vec<Implicant>,
}

impl Dnf {
    /// Minimizes the Boolean function with the given truth vector.
    ///
    /// Entry `i` of `truth` is the function value at the assignment whose bit `j` is the
    /// value of variable `j`.
    ///
    /// # Panics
    ///
    /// Panics if `truth.len() != 2^vnumber` or if any entry is neither 0 nor 1.
    pub fn new(vnumber: usize, truth: &[u8]) -> Self {
        assert!(vnumber < 32, "Too many variables: {}", vnumber);
        assert_eq!(
            truth.len(),
            1usize << vnumber,
            "Truth vector for {} variables must have {} entries",
            vnumber,
            1usize << vnumber
        );
        assert!(
            truth.iter().all(|&b| b <= 1),
            "Truth vector entries must be 0 or 1"
        );

        debug!(
            "Dnf::new(vnumber = {}, true entries = {})",
            vnumber,
            truth.iter().filter(|&&b| b == 1).count()
        );

        let candidates = Self::collect_primes(Generation::from_truth_vector(vnumber, truth));
        let primes = Self::drop_redundant(candidates, MintermSet::from_truth_vector(truth));

        debug!("Dnf::new: {} primes kept", primes.len());
        Self { vnumber, primes }
    }

    /// Merges generations until a fixpoint and returns all primes in discovery order.
    fn collect_primes(mut generation: Generation) -> Vec<Implicant> {
        let mut primes = Vec::new();
        let mut round = 0;
        loop {
            let Round {
                next,
                primes: found,
                merges,
            } = merge_round(&generation);
            round += 1;
            debug!(
                "round {}: {} implicants, {} merges, {} primes",
                round,
                generation.len(),
                merges,
                found.len()
            );
            primes.extend(found);
            if merges == 0 {
                break;
            }
            generation = next;
        }
        primes
    }

    /// Greedy left-to-right pass keeping primes that still cover a required minterm.
    fn drop_redundant(candidates: Vec<Implicant>, mut required: MintermSet) -> Vec<Implicant> {
        let mut kept = Vec::new();
        for imp in candidates {
            if required.intersects(imp.minterms()) {
                required.remove_all(imp.minterms());
                kept.push(imp);
            } else {
                trace!("dropping redundant implicant {}", imp);
            }
        }
        kept
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.vnumber
    }

    /// Returns the surviving prime implicants in discovery order.
    pub fn primes(&self) -> &[Implicant] {
        &self.primes
    }

    /// Assembles the formula tree of this DNF.
    pub fn to_formula(&self) -> Formula {
        match self.primes.as_slice() {
            [] => Formula::Const(false),
            [prime] => prime.to_formula(),
            primes => Formula::or(primes.iter().map(Implicant::to_formula).collect()),
        }
    }

    /// Renders the DNF over the given variable names, e.g. `(x&~y)|z`.
    ///
    /// A conjunction gets parentheses only when there is more than one of them and it
    /// contains an `&`. The empty DNF renders as `0`.
    ///
    /// # Panics
    ///
    /// Panics unless there is exactly one name per variable.
    pub fn to_expression_string<S: AsRef<str>>(&self, names: &[S]) -> String {
        assert_eq!(
            names.len(),
            self.vnumber,
            "Expected {} variable names, got {}",
            self.vnumber,
            names.len()
        );

        if self.primes.is_empty() {
            return "0".to_string();
        }

        let multiple = self.primes.len() > 1;
        self.primes
            .iter()
            .map(|p| {
                let s = p.render(names);
                if multiple && s.contains('&') {
                    format!("({})", s)
                } else {
                    s
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for Dnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "implicants:")?;
        for imp in &self.primes {
            writeln!(f, "    {}", imp)?;
        }
        Ok(())
    }
}
