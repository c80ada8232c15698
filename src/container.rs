//! Storage for the low 16 bits of values that share a high prefix.
//!
//! A container starts sparse, as a sorted list of distinct `u16` values, and
//! converts to a dense bit vector once it would hold [`SPARSE_THRESHOLD`] values.
//! The conversion happens inside the insertion that crosses the threshold and
//! is never undone by later mutation.

use crate::constants::SPARSE_THRESHOLD;
use crate::dense::{Dense, Ones};
use crate::error::{BitmapError, Result};
use crate::{HeapSize, Len};

/// The members of one 2^16 block, in one of two representations.
///
/// The representation is private; containers are built by insertion, by
/// [`TryFrom<Vec<u16>>`], or from a [`Dense`] vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "raw::Container", into = "raw::Container"))]
#[derive(Clone, Debug, Default)]
pub struct Container(pub(crate) Repr);

#[derive(Clone, Debug)]
pub(crate) enum Repr {
    /// Strictly ascending values, fewer than `SPARSE_THRESHOLD` of them.
    Sparse(Vec<u16>),
    /// One bit per possible value.
    Dense(Dense),
}

impl Default for Repr {
    fn default() -> Self { Repr::Sparse(Vec::new()) }
}

impl Container {
    /// An empty sparse container.
    pub fn new() -> Self { Self::default() }

    /// Inserts `value`, returning `true` if it was not already present.
    ///
    /// A sparse container reaching `SPARSE_THRESHOLD` values is rewritten as
    /// dense before this returns.
    pub fn add(&mut self, value: u16) -> bool {
        match &mut self.0 {
            Repr::Sparse(values) => {
                let Err(position) = values.binary_search(&value) else { return false; };
                values.insert(position, value);
                if values.len() >= SPARSE_THRESHOLD {
                    self.convert_to_dense();
                }
                true
            }
            Repr::Dense(dense) => dense.insert(value),
        }
    }

    /// Removes `value`, returning `true` if it was present.
    ///
    /// Dense containers stay dense, whatever their remaining occupancy.
    pub fn remove(&mut self, value: u16) -> bool {
        match &mut self.0 {
            Repr::Sparse(values) => match values.binary_search(&value) {
                Ok(position) => { values.remove(position); true }
                Err(_) => false,
            },
            Repr::Dense(dense) => dense.remove(value),
        }
    }

    #[inline]
    pub fn contains(&self, value: u16) -> bool {
        match &self.0 {
            Repr::Sparse(values) => values.binary_search(&value).is_ok(),
            Repr::Dense(dense) => dense.contains(value),
        }
    }

    /// The number of values present.
    #[inline]
    pub fn cardinality(&self) -> usize {
        match &self.0 {
            Repr::Sparse(values) => values.len(),
            Repr::Dense(dense) => dense.count_ones(),
        }
    }

    pub fn is_sparse(&self) -> bool { matches!(self.0, Repr::Sparse(_)) }
    pub fn is_dense(&self) -> bool { matches!(self.0, Repr::Dense(_)) }

    pub fn min(&self) -> Option<u16> {
        match &self.0 {
            Repr::Sparse(values) => values.first().copied(),
            Repr::Dense(dense) => dense.min(),
        }
    }

    pub fn max(&self) -> Option<u16> {
        match &self.0 {
            Repr::Sparse(values) => values.last().copied(),
            Repr::Dense(dense) => dense.max(),
        }
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        match &self.0 {
            Repr::Sparse(values) => Iter::Sparse(values.iter()),
            Repr::Dense(dense) => Iter::Dense(dense.iter()),
        }
    }

    /// A dense copy of the contents, whatever the current representation.
    pub fn to_dense(&self) -> Dense {
        match &self.0 {
            Repr::Sparse(values) => {
                let mut dense = Dense::new();
                dense.extend_from_slice(values);
                dense
            }
            Repr::Dense(dense) => dense.clone(),
        }
    }

    fn convert_to_dense(&mut self) {
        if let Repr::Sparse(values) = &self.0 {
            tracing::trace!(len = values.len(), "converting sparse container to dense");
            let mut dense = Dense::new();
            dense.extend_from_slice(values);
            self.0 = Repr::Dense(dense);
        }
    }

    /// Wraps strictly ascending values in the representation their count calls for.
    pub(crate) fn from_sorted_unchecked(values: Vec<u16>) -> Self {
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));
        let mut container = Container(Repr::Sparse(values));
        if container.cardinality() >= SPARSE_THRESHOLD {
            container.convert_to_dense();
        }
        container
    }

    /// Wraps a dense vector, demoting it to sparse if it holds fewer than
    /// `SPARSE_THRESHOLD` values.
    pub fn from_dense(dense: Dense) -> Self {
        if dense.count_ones() < SPARSE_THRESHOLD {
            Container(Repr::Sparse(dense.to_sparse()))
        } else {
            Container(Repr::Dense(dense))
        }
    }
}

impl Len for Container {
    #[inline(always)] fn len(&self) -> usize { self.cardinality() }
}

impl HeapSize for Container {
    fn heap_size(&self) -> (usize, usize) {
        match &self.0 {
            Repr::Sparse(values) => values.heap_size(),
            Repr::Dense(dense) => dense.heap_size(),
        }
    }
}

// Equality is over members, so a sparse and a dense container may be equal.
impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Sparse(a), Repr::Sparse(b)) => a == b,
            (Repr::Dense(a), Repr::Dense(b)) => a == b,
            _ => self.cardinality() == other.cardinality() && self.iter().eq(other.iter()),
        }
    }
}
impl Eq for Container { }

/// Builds a container from strictly ascending values.
impl TryFrom<Vec<u16>> for Container {
    type Error = BitmapError;
    fn try_from(values: Vec<u16>) -> Result<Self> {
        if let Some(position) = values.windows(2).position(|w| w[0] >= w[1]) {
            return Err(BitmapError::UnsortedSparse {
                position: position + 1,
                previous: values[position],
                value: values[position + 1],
            });
        }
        Ok(Container::from_sorted_unchecked(values))
    }
}

impl FromIterator<u16> for Container {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut container = Container::new();
        for value in iter {
            container.add(value);
        }
        container
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = u16;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// Ascending iterator over the values of a [`Container`].
#[derive(Clone)]
pub enum Iter<'a> {
    Sparse(std::slice::Iter<'a, u16>),
    Dense(Ones<'a>),
}

impl Iterator for Iter<'_> {
    type Item = u16;
    #[inline]
    fn next(&mut self) -> Option<u16> {
        match self {
            Iter::Sparse(iter) => iter.next().copied(),
            Iter::Dense(iter) => iter.next(),
        }
    }
}

#[cfg(feature = "serde")]
mod raw {
    use super::Repr;
    use crate::constants::SPARSE_THRESHOLD;
    use crate::dense::Dense;
    use crate::error::{BitmapError, Result};

    /// Serialized form of a container, checked before it becomes one.
    #[derive(serde::Serialize, serde::Deserialize)]
    pub enum Container {
        Sparse(Vec<u16>),
        Dense(Dense),
    }

    impl From<super::Container> for Container {
        fn from(container: super::Container) -> Self {
            match container.0 {
                Repr::Sparse(values) => Container::Sparse(values),
                Repr::Dense(dense) => Container::Dense(dense),
            }
        }
    }

    impl TryFrom<Container> for super::Container {
        type Error = BitmapError;
        fn try_from(raw: Container) -> Result<Self> {
            match raw {
                Container::Sparse(values) => {
                    if values.len() >= SPARSE_THRESHOLD {
                        return Err(BitmapError::OversizedSparse { len: values.len(), limit: SPARSE_THRESHOLD });
                    }
                    super::Container::try_from(values)
                }
                Container::Dense(dense) => Ok(super::Container(Repr::Dense(dense))),
            }
        }
    }
}
