//! Implicants: conjunctions of literals in ternary-vector form.
//!
//! An implicant over `v` variables is a vector of `v` [`Slot`]s. Slot `i` describes how
//! variable `i` occurs in the conjunction. Alongside the vector, the implicant records
//! the minterms it was built from; for an implicant produced by merging, these are
//! exactly the assignments it accepts.

use std::fmt;

use crate::formula::Formula;
use crate::types::Slot;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Implicant {
    slots: Vec<Slot>,
    /// Covered minterms, ascending and never empty.
    minterms: Vec<u32>,
}

impl Implicant {
    /// Creates the implicant of a single minterm over `vnumber` variables.
    ///
    /// Bit `i` of `minterm` becomes slot `i`.
    ///
    /// # Panics
    ///
    /// Panics if `minterm` has bits set at or above `vnumber`.
    pub fn new(vnumber: usize, minterm: u32) -> Self {
        assert!(
            vnumber >= 32 || minterm >> vnumber == 0,
            "Minterm {} does not fit into {} variables",
            minterm,
            vnumber
        );
        let slots = (0..vnumber)
            .map(|i| Slot::from_bit(i < 32 && (minterm >> i) & 1 == 1))
            .collect();
        Self {
            slots,
            minterms: vec![minterm],
        }
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true for an implicant over zero variables.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the covered minterms in ascending order.
    pub fn minterms(&self) -> &[u32] {
        &self.minterms
    }

    /// Returns the number of [`Slot::One`] entries.
    pub fn count_ones(&self) -> usize {
        self.slots.iter().filter(|&&s| s == Slot::One).count()
    }

    /// Returns the number of assigned (non-don't-care) slots.
    pub fn count_assigned(&self) -> usize {
        self.slots.iter().filter(|s| s.is_assigned()).count()
    }

    /// Checks whether the implicant accepts the assignment (bit `i` = variable `i`).
    pub fn accepts(&self, assignment: u64) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(i, s)| s.accepts((assignment >> i) & 1 == 1))
    }

    /// Tries to merge two implicants.
    ///
    /// The merge succeeds iff the vectors differ in exactly one slot and that slot is
    /// assigned in both; the result has a don't-care there and covers the union of
    /// both minterm lists.
    ///
    /// # Panics
    ///
    /// Panics if the implicants have different lengths.
    pub fn try_merge(&self, other: &Implicant) -> Option<Implicant> {
        assert_eq!(
            self.len(),
            other.len(),
            "Cannot merge implicants of different lengths"
        );

        let mut diff = None;
        for (i, (a, b)) in self.slots.iter().zip(&other.slots).enumerate() {
            if a == b {
                continue;
            }
            // A second difference, or a difference against a don't-care.
            if diff.is_some() || !a.is_assigned() || !b.is_assigned() {
                return None;
            }
            diff = Some(i);
        }
        let diff = diff?;

        let mut slots = self.slots.clone();
        slots[diff] = Slot::DontCare;

        Some(Implicant {
            slots,
            minterms: merge_sorted(&self.minterms, &other.minterms),
        })
    }

    /// Converts the implicant into a conjunction of literals.
    pub fn to_formula(&self) -> Formula {
        let literals = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.bit().map(|bit| Formula::literal(i, !bit)))
            .collect();
        Formula::and(literals)
    }

    /// Renders the conjunction over the given variable names.
    ///
    /// Literals are joined by `&`, negated ones carry a `~` prefix. Without any
    /// assigned slot the result is `-1`, the all-ones constant.
    ///
    /// # Panics
    ///
    /// Panics unless there is exactly one name per slot.
    pub fn render<S: AsRef<str>>(&self, names: &[S]) -> String {
        assert_eq!(
            names.len(),
            self.len(),
            "Expected {} variable names, got {}",
            self.len(),
            names.len()
        );

        let mut s = String::new();
        for (slot, name) in self.slots.iter().zip(names) {
            let Some(bit) = slot.bit() else {
                continue;
            };
            if !s.is_empty() {
                s.push('&');
            }
            if !bit {
                s.push('~');
            }
            s.push_str(name.as_ref());
        }

        if s.is_empty() {
            "-1".to_string()
        } else {
            s
        }
    }
}

impl fmt::Display for Implicant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot)?;
        }
        Ok(())
    }
}

fn merge_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            result.push(a[i]);
            i += 1;
        } else if b[j] < a[i] {
            result.push(b[j]);
            j += 1;
        } else {
            result.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn merged(a: &Implicant, b: &Implicant) -> Implicant {
        a.try_merge(b).expect("implicants should merge")
    }

    #[test]
    fn test_new_lsb_first() {
        let imp = Implicant::new(4, 0b0110);
        assert_eq!(imp.slots(), &[Slot::Zero, Slot::One, Slot::One, Slot::Zero]);
        assert_eq!(imp.minterms(), &[6]);
        assert_eq!(imp.count_ones(), 2);
        assert_eq!(imp.to_string(), "0110");
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_new_minterm_too_large() {
        Implicant::new(2, 4);
    }

    #[test]
    fn test_merge_one_difference() {
        let a = Implicant::new(3, 0b001);
        let b = Implicant::new(3, 0b011);
        let m = merged(&a, &b);
        assert_eq!(m.slots(), &[Slot::One, Slot::DontCare, Slot::Zero]);
        assert_eq!(m.minterms(), &[1, 3]);
        assert_eq!(m.count_ones(), 1);
        // Merging is symmetric.
        assert_eq!(b.try_merge(&a), Some(m));
    }

    #[test]
    fn test_merge_rejects_zero_and_two_differences() {
        let a = Implicant::new(3, 0b101);
        assert_eq!(a.try_merge(&a), None);
        assert_eq!(a.try_merge(&Implicant::new(3, 0b110)), None);
        assert_eq!(a.try_merge(&Implicant::new(3, 0b010)), None);
    }

    #[test]
    fn test_merge_against_dont_care() {
        // 1-0 and 110: differ only in slot 1, which is a don't-care on one side.
        let a = merged(&Implicant::new(3, 0b001), &Implicant::new(3, 0b011));
        let b = Implicant::new(3, 0b011);
        assert_eq!(a.try_merge(&b), None);

        // 1-0 and 0-0 share the don't-care and merge into --0.
        let c = merged(&Implicant::new(3, 0b000), &Implicant::new(3, 0b010));
        let m = merged(&a, &c);
        assert_eq!(m.to_string(), "--0");
        assert_eq!(m.minterms(), &[0, 1, 2, 3]);

        // 1-0 and -10 differ in two slots.
        let d = merged(&Implicant::new(3, 0b010), &Implicant::new(3, 0b011));
        assert_eq!(a.try_merge(&d), None);
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_merge_length_mismatch() {
        let _ = Implicant::new(2, 1).try_merge(&Implicant::new(3, 1));
    }

    #[test]
    fn test_merged_minterms_are_accepted() {
        let m = merged(
            &merged(&Implicant::new(3, 0b100), &Implicant::new(3, 0b101)),
            &merged(&Implicant::new(3, 0b110), &Implicant::new(3, 0b111)),
        );
        assert_eq!(m.to_string(), "--1");
        let accepted: Vec<u32> = (0..8).filter(|&a| m.accepts(a as u64)).collect();
        assert_eq!(accepted, m.minterms());
    }

    #[test]
    fn test_to_formula() {
        let m = merged(&Implicant::new(3, 0b001), &Implicant::new(3, 0b011));
        assert_eq!(
            m.to_formula(),
            Formula::And(vec![Formula::literal(0, false), Formula::literal(2, true)])
        );

        let single = merged(&Implicant::new(2, 0b00), &Implicant::new(2, 0b01));
        assert_eq!(single.to_formula(), Formula::literal(1, true));

        let all = merged(
            &merged(&Implicant::new(2, 0), &Implicant::new(2, 1)),
            &merged(&Implicant::new(2, 2), &Implicant::new(2, 3)),
        );
        assert_eq!(all.to_formula(), Formula::Const(true));
    }

    #[test]
    fn test_render() {
        let m = merged(&Implicant::new(3, 0b001), &Implicant::new(3, 0b011));
        assert_eq!(m.render(&["x", "y", "z"]), "x&~z");

        let all = merged(&Implicant::new(1, 0), &Implicant::new(1, 1));
        assert_eq!(all.render(&["x"]), "-1");
    }

    #[test]
    fn test_merge_sorted() {
        assert_eq!(merge_sorted(&[1, 5, 9], &[2, 5, 10]), vec![1, 2, 5, 9, 10]);
        assert_eq!(merge_sorted(&[], &[3]), vec![3]);
    }
}
