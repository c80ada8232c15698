//! Union, intersection and difference of bitmaps.
//!
//! Operands are only read. Every container placed in a result is freshly
//! built or cloned, so results share no storage with their operands.
//! Unions with a dense operand are dense. Every other container produced
//! here is sparse below `SPARSE_THRESHOLD` values and dense otherwise, and
//! empty results are never stored.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::bitmap::Bitmap;
use crate::container::{Container, Repr};

/// Merges two ascending lists, keeping each value once.
fn merge_union(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => { result.push(a[i]); i += 1; }
            Ordering::Greater => { result.push(b[j]); j += 1; }
            Ordering::Equal => { result.push(a[i]); i += 1; j += 1; }
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

/// Keeps the values common to two ascending lists.
fn merge_intersection(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut result = Vec::with_capacity(std::cmp::min(a.len(), b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => { result.push(a[i]); i += 1; j += 1; }
        }
    }
    result
}

/// Keeps the values of `a` absent from `b`, both ascending.
fn merge_difference(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut result = Vec::with_capacity(a.len());
    let mut j = 0;
    for &value in a {
        while j < b.len() && b[j] < value { j += 1; }
        if j == b.len() || b[j] != value { result.push(value); }
    }
    result
}

/// The union of two containers.
///
/// A dense operand makes a dense result; two sparse operands merge and turn
/// dense only if the merged count reaches `SPARSE_THRESHOLD`.
pub(crate) fn union(a: &Container, b: &Container) -> Container {
    match (&a.0, &b.0) {
        (Repr::Sparse(a), Repr::Sparse(b)) => Container::from_sorted_unchecked(merge_union(a, b)),
        (Repr::Dense(dense), Repr::Sparse(values))
        | (Repr::Sparse(values), Repr::Dense(dense)) => {
            let mut result = dense.clone();
            result.extend_from_slice(values);
            Container(Repr::Dense(result))
        }
        (Repr::Dense(a), Repr::Dense(b)) => {
            let mut result = a.clone();
            result.union_assign(b);
            Container(Repr::Dense(result))
        }
    }
}

/// The intersection of two containers, or `None` if they share no values.
pub(crate) fn intersection(a: &Container, b: &Container) -> Option<Container> {
    let result = match (&a.0, &b.0) {
        (Repr::Sparse(a), Repr::Sparse(b)) => Container(Repr::Sparse(merge_intersection(a, b))),
        (Repr::Dense(dense), _) => {
            let mut result = b.to_dense();
            result.intersect_assign(dense);
            Container::from_dense(result)
        }
        (_, Repr::Dense(dense)) => {
            let mut result = a.to_dense();
            result.intersect_assign(dense);
            Container::from_dense(result)
        }
    };
    non_empty(result)
}

/// The values of `a` absent from `b`, or `None` if there are none.
pub(crate) fn difference(a: &Container, b: &Container) -> Option<Container> {
    let result = match (&a.0, &b.0) {
        (Repr::Sparse(a), Repr::Sparse(b)) => Container(Repr::Sparse(merge_difference(a, b))),
        (Repr::Sparse(a), Repr::Dense(b)) => {
            Container(Repr::Sparse(a.iter().copied().filter(|v| !b.contains(*v)).collect()))
        }
        (Repr::Dense(dense), _) => {
            let mut result = dense.clone();
            result.difference_assign(&b.to_dense());
            Container::from_dense(result)
        }
    };
    non_empty(result)
}

fn non_empty(container: Container) -> Option<Container> {
    if container.cardinality() == 0 {
        tracing::trace!("dropping empty container");
        None
    } else {
        Some(container)
    }
}

impl Bitmap {
    /// A new bitmap holding the values present in `self` or `other`.
    ///
    /// Keys held by one side only are copied; shared keys are merged container by container.
    pub fn union_with(&self, other: &Bitmap) -> Bitmap {
        let mut containers = BTreeMap::new();
        let mut lhs = self.containers.iter().peekable();
        let mut rhs = other.containers.iter().peekable();
        loop {
            let order = match (lhs.peek(), rhs.peek()) {
                (Some((a, _)), Some((b, _))) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            match order {
                Ordering::Less => {
                    let Some((key, container)) = lhs.next() else { break; };
                    containers.insert(*key, container.clone());
                }
                Ordering::Greater => {
                    let Some((key, container)) = rhs.next() else { break; };
                    containers.insert(*key, container.clone());
                }
                Ordering::Equal => {
                    let (Some((key, a)), Some((_, b))) = (lhs.next(), rhs.next()) else { break; };
                    containers.insert(*key, union(a, b));
                }
            }
        }
        Bitmap { containers }
    }

    /// A new bitmap holding the values present in both `self` and `other`.
    ///
    /// Only keys held by both sides can contribute.
    pub fn intersect_with(&self, other: &Bitmap) -> Bitmap {
        // Walk the side with fewer containers.
        let (small, large) = if self.containers.len() <= other.containers.len() { (self, other) } else { (other, self) };
        let containers = small.containers.iter()
            .filter_map(|(key, a)| {
                let b = large.containers.get(key)?;
                intersection(a, b).map(|c| (*key, c))
            })
            .collect();
        Bitmap { containers }
    }

    /// A new bitmap holding the values present in `self` but not in `other`.
    pub fn difference_with(&self, other: &Bitmap) -> Bitmap {
        let containers = self.containers.iter()
            .filter_map(|(key, a)| match other.containers.get(key) {
                Some(b) => difference(a, b).map(|c| (*key, c)),
                None => Some((*key, a.clone())),
            })
            .collect();
        Bitmap { containers }
    }
}

impl std::ops::BitOr<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitor(self, other: &Bitmap) -> Bitmap { self.union_with(other) }
}

impl std::ops::BitAnd<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn bitand(self, other: &Bitmap) -> Bitmap { self.intersect_with(other) }
}

impl std::ops::Sub<&Bitmap> for &Bitmap {
    type Output = Bitmap;
    fn sub(self, other: &Bitmap) -> Bitmap { self.difference_with(other) }
}
