//! Small value types shared by the minimizer.
//!
//! A [`Slot`] is one position of an implicant's ternary vector: the variable
//! either occurs positively, occurs negated, or does not matter at all.
use std::fmt;

/// One entry of a ternary implicant vector.
///
/// # Invariants
///
/// - A freshly built implicant has no [`Slot::DontCare`] entries.
/// - Every successful merge turns exactly one assigned slot into [`Slot::DontCare`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Slot {
    /// The variable appears negated.
    Zero,
    /// The variable appears positively.
    One,
    /// The variable has no influence.
    DontCare,
}

impl Slot {
    /// Creates an assigned slot from a bit value.
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Slot::One
        } else {
            Slot::Zero
        }
    }

    /// Returns true unless the slot is a don't-care.
    pub fn is_assigned(self) -> bool {
        self != Slot::DontCare
    }

    /// Returns the bit value of an assigned slot, or `None` for a don't-care.
    pub fn bit(self) -> Option<bool> {
        match self {
            Slot::Zero => Some(false),
            Slot::One => Some(true),
            Slot::DontCare => None,
        }
    }

    /// Checks whether the slot accepts the given variable value.
    pub fn accepts(self, value: bool) -> bool {
        match self.bit() {
            Some(bit) => bit == value,
            None => true,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Slot::Zero => '0',
            Slot::One => '1',
            Slot::DontCare => '-',
        };
        write!(f, "{}", c)
    }
}

impl From<bool> for Slot {
    fn from(bit: bool) -> Self {
        Slot::from_bit(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_slot_from_bit() {
        assert_eq!(Slot::from_bit(true), Slot::One);
        assert_eq!(Slot::from_bit(false), Slot::Zero);
        assert_eq!(Slot::from(true), Slot::One);
    }

    #[test]
    fn test_slot_accepts() {
        assert!(Slot::One.accepts(true));
        assert!(!Slot::One.accepts(false));
        assert!(Slot::Zero.accepts(false));
        assert!(!Slot::Zero.accepts(true));
        assert!(Slot::DontCare.accepts(true));
        assert!(Slot::DontCare.accepts(false));
    }

    #[test]
    fn test_slot_display() {
        let s: String = [Slot::One, Slot::DontCare, Slot::Zero]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(s, "1-0");
    }
}
