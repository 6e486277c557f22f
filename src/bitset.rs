//! Dense minterm set over a fixed universe.
//!
//! The pruning pass of the minimizer keeps track of every minterm that still needs
//! to be covered. Minterms are indices below `2^v`, so a flat bit vector is the
//! natural representation.

/// A set of minterms backed by a vector of u64 words.
///
/// The universe is fixed at construction time; indices outside of it are never members.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MintermSet {
    /// Storage: each u64 holds 64 minterms
    words: Vec<u64>,
    /// Number of members (cached for O(1) len())
    count: usize,
    /// Size of the universe in bits
    universe: usize,
}

impl MintermSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty set over the universe `0..universe`.
    pub fn new(universe: usize) -> Self {
        let num_words = universe.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; num_words],
            count: 0,
            universe,
        }
    }

    /// Creates the set of all indices `i` with `truth[i] == 1`.
    pub fn from_truth_vector(truth: &[u8]) -> Self {
        let mut set = Self::new(truth.len());
        for (i, &bit) in truth.iter().enumerate() {
            if bit == 1 {
                set.insert(i as u32);
            }
        }
        set
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the size of the universe.
    #[inline]
    pub fn universe(&self) -> usize {
        self.universe
    }

    #[inline]
    fn word_and_bit(minterm: u32) -> (usize, usize) {
        let index = minterm as usize;
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns true if the minterm is a member.
    #[inline]
    pub fn contains(&self, minterm: u32) -> bool {
        if minterm as usize >= self.universe {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(minterm);
        (self.words[word_idx] >> bit_idx) & 1 == 1
    }

    /// Adds the minterm. Returns true if it was not a member before.
    ///
    /// # Panics
    ///
    /// Panics if the minterm lies outside of the universe.
    #[inline]
    pub fn insert(&mut self, minterm: u32) -> bool {
        assert!(
            (minterm as usize) < self.universe,
            "Minterm {} out of range for universe of size {}",
            minterm,
            self.universe
        );
        let (word_idx, bit_idx) = Self::word_and_bit(minterm);
        let mask = 1u64 << bit_idx;
        let was_clear = self.words[word_idx] & mask == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Removes the minterm. Returns true if it was a member.
    #[inline]
    pub fn remove(&mut self, minterm: u32) -> bool {
        if !self.contains(minterm) {
            return false;
        }
        let (word_idx, bit_idx) = Self::word_and_bit(minterm);
        self.words[word_idx] &= !(1u64 << bit_idx);
        self.count -= 1;
        true
    }

    /// Returns true if any of the given minterms is a member.
    pub fn intersects(&self, minterms: &[u32]) -> bool {
        minterms.iter().any(|&m| self.contains(m))
    }

    /// Removes all of the given minterms.
    pub fn remove_all(&mut self, minterms: &[u32]) {
        for &m in minterms {
            self.remove(m);
        }
    }
}
