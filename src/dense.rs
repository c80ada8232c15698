//! A fixed-width bit vector covering every possible low value of a container.

use crate::constants::{DENSE_WORDS, WORD_BITS};
use crate::error::{BitmapError, Result};
use crate::{HeapSize, Len};

/// One bit per possible `u16`, packed into `u64` words.
///
/// Bit `v` lives in word `v / 64` at position `v % 64`. The width is fixed,
/// so the storage is a boxed array rather than a growable vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u64>", into = "Vec<u64>"))]
#[derive(Clone, PartialEq, Eq)]
pub struct Dense {
    words: Box<[u64; DENSE_WORDS]>,
}

impl Default for Dense {
    fn default() -> Self {
        Self { words: bytemuck::zeroed_box() }
    }
}

impl std::fmt::Debug for Dense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dense").field("len", &self.len()).finish()
    }
}

#[inline(always)]
fn locate(value: u16) -> (usize, u64) {
    let value = value as usize;
    (value / WORD_BITS, 1 << (value % WORD_BITS))
}

impl Dense {
    /// An empty bit vector.
    pub fn new() -> Self { Self::default() }

    /// Sets the bit for `value`, returning `true` if it was previously unset.
    #[inline]
    pub fn insert(&mut self, value: u16) -> bool {
        let (word, mask) = locate(value);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    /// Unsets the bit for `value`, returning `true` if it was previously set.
    #[inline]
    pub fn remove(&mut self, value: u16) -> bool {
        let (word, mask) = locate(value);
        let present = self.words[word] & mask != 0;
        self.words[word] &= !mask;
        present
    }

    #[inline(always)]
    pub fn contains(&self, value: u16) -> bool {
        let (word, mask) = locate(value);
        self.words[word] & mask != 0
    }

    /// Population count over all words.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Sets the bit of every value in `values`.
    pub fn extend_from_slice(&mut self, values: &[u16]) {
        for &value in values {
            let (word, mask) = locate(value);
            self.words[word] |= mask;
        }
    }

    /// Word-wise `|=`.
    pub fn union_assign(&mut self, other: &Dense) {
        for (word, other) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= *other;
        }
    }

    /// Word-wise `&=`.
    pub fn intersect_assign(&mut self, other: &Dense) {
        for (word, other) in self.words.iter_mut().zip(other.words.iter()) {
            *word &= *other;
        }
    }

    /// Word-wise `&= !other`.
    pub fn difference_assign(&mut self, other: &Dense) {
        for (word, other) in self.words.iter_mut().zip(other.words.iter()) {
            *word &= !*other;
        }
    }

    /// The smallest set bit, if any.
    pub fn min(&self) -> Option<u16> {
        self.words.iter().enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| (i * WORD_BITS + w.trailing_zeros() as usize) as u16)
    }

    /// The largest set bit, if any.
    pub fn max(&self) -> Option<u16> {
        self.words.iter().enumerate().rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| (i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize)) as u16)
    }

    /// Collects the set bits in ascending order.
    pub fn to_sparse(&self) -> Vec<u16> {
        let mut values = Vec::with_capacity(self.count_ones());
        values.extend(self.iter());
        values
    }

    /// Iterates over set bits in ascending order.
    pub fn iter(&self) -> Ones<'_> {
        Ones { words: &self.words[..], index: 0, word: self.words[0] }
    }
}

impl Len for Dense {
    #[inline(always)] fn len(&self) -> usize { self.count_ones() }
    #[inline] fn is_empty(&self) -> bool { self.words.iter().all(|w| *w == 0) }
}

impl HeapSize for Dense {
    #[inline(always)]
    fn heap_size(&self) -> (usize, usize) { self.words.heap_size() }
}

impl TryFrom<Vec<u64>> for Dense {
    type Error = BitmapError;
    fn try_from(words: Vec<u64>) -> Result<Self> {
        let words: Box<[u64; DENSE_WORDS]> = words
            .into_boxed_slice()
            .try_into()
            .map_err(|words: Box<[u64]>| BitmapError::DenseWidth { words: words.len(), expected: DENSE_WORDS })?;
        Ok(Self { words })
    }
}

impl From<Dense> for Vec<u64> {
    fn from(dense: Dense) -> Self {
        dense.words.to_vec()
    }
}

/// Iterator over the set bits of a [`Dense`], ascending.
#[derive(Clone)]
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    /// Remaining set bits of `words[index]`.
    word: u64,
}

impl Iterator for Ones<'_> {
    type Item = u16;
    #[inline]
    fn next(&mut self) -> Option<u16> {
        while self.word == 0 {
            self.index += 1;
            if self.index >= self.words.len() { return None; }
            self.word = self.words[self.index];
        }
        let bit = self.word.trailing_zeros() as usize;
        // Clear the lowest set bit.
        self.word &= self.word - 1;
        Some((self.index * WORD_BITS + bit) as u16)
    }
}

#[cfg(test)]
mod test {
    use super::Dense;
    use crate::{HeapSize, Len};

    #[test]
    fn insert_remove() {
        let mut dense = Dense::new();
        assert!(dense.is_empty());
        assert!(dense.insert(0));
        assert!(dense.insert(65535));
        assert!(!dense.insert(0));
        assert!(dense.contains(0) && dense.contains(65535));
        assert!(!dense.contains(1));
        assert_eq!(dense.len(), 2);
        assert!(dense.remove(0));
        assert!(!dense.remove(0));
        assert_eq!(dense.len(), 1);
    }

    #[test]
    fn iterate_and_bounds() {
        let mut dense = Dense::new();
        let values = [3u16, 63, 64, 127, 1000, 40000, 65535];
        dense.extend_from_slice(&values);
        assert_eq!(dense.iter().collect::<Vec<_>>(), values);
        assert_eq!(dense.to_sparse(), values);
        assert_eq!(dense.min(), Some(3));
        assert_eq!(dense.max(), Some(65535));
        assert_eq!(Dense::new().min(), None);
        assert_eq!(Dense::new().iter().next(), None);
    }

    #[test]
    fn word_ops() {
        let mut evens = Dense::new();
        let mut threes = Dense::new();
        for v in 0 .. 300u16 {
            if v % 2 == 0 { evens.insert(v); }
            if v % 3 == 0 { threes.insert(v); }
        }
        let mut both = evens.clone();
        both.intersect_assign(&threes);
        assert!(both.iter().all(|v| v % 6 == 0));
        assert_eq!(both.len(), 50);

        let mut either = evens.clone();
        either.union_assign(&threes);
        assert_eq!(either.len(), 150 + 100 - 50);

        let mut only = evens.clone();
        only.difference_assign(&threes);
        assert_eq!(only.len(), 100);
    }

    #[test]
    fn fixed_width() {
        let dense = Dense::new();
        assert_eq!(dense.heap_size(), (8192, 8192));
        assert!(Dense::try_from(vec![0u64; 10]).is_err());
        assert!(Dense::try_from(vec![0u64; 1024]).is_ok());
    }
}
