//! Sets of `u32` values, routed to per-prefix containers.

use std::collections::BTreeMap;

use crate::constants::{join, split};
use crate::container::{self, Container};
use crate::{Clear, HeapSize};

/// A compressed set of `u32` values.
///
/// Each value is split into a 16-bit high prefix, which selects a container,
/// and a 16-bit low value stored by that container. Containers are created on
/// first insertion and a stored container is never empty.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "raw::Bitmap"))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitmap {
    pub(crate) containers: BTreeMap<u16, Container>,
}

/// Counts describing how a [`Bitmap`] is laid out in memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Number of containers, sparse and dense.
    pub containers: usize,
    pub sparse_containers: usize,
    pub dense_containers: usize,
    /// Values across all containers.
    pub cardinality: u64,
    /// Heap bytes in use by container storage.
    pub heap_bytes: usize,
}

impl Bitmap {
    /// An empty bitmap.
    pub fn new() -> Self { Self::default() }

    /// Inserts `value`, returning `true` if it was not already present.
    pub fn add(&mut self, value: u32) -> bool {
        let (high, low) = split(value);
        self.containers.entry(high).or_default().add(low)
    }

    /// Removes `value`, returning `true` if it was present.
    pub fn remove(&mut self, value: u32) -> bool {
        let (high, low) = split(value);
        let Some(container) = self.containers.get_mut(&high) else { return false; };
        let removed = container.remove(low);
        if removed && container.cardinality() == 0 {
            self.containers.remove(&high);
        }
        removed
    }

    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        let (high, low) = split(value);
        self.containers.get(&high).is_some_and(|c| c.contains(low))
    }

    /// The number of distinct values present.
    ///
    /// This sums over containers on each call.
    pub fn cardinality(&self) -> u64 {
        self.containers.values().map(|c| c.cardinality() as u64).sum()
    }

    pub fn is_empty(&self) -> bool { self.containers.is_empty() }

    /// Removes every value.
    pub fn clear(&mut self) {
        tracing::debug!(containers = self.containers.len(), "clearing bitmap");
        self.containers.clear();
    }

    pub fn min(&self) -> Option<u32> {
        let (high, container) = self.containers.first_key_value()?;
        container.min().map(|low| join(*high, low))
    }

    pub fn max(&self) -> Option<u32> {
        let (high, container) = self.containers.last_key_value()?;
        container.max().map(|low| join(*high, low))
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { containers: self.containers.iter(), current: None }
    }

    /// The number of containers, which is the number of distinct high prefixes.
    pub fn container_count(&self) -> usize { self.containers.len() }

    /// The container for the high prefix `high`, if any.
    pub fn container(&self, high: u16) -> Option<&Container> { self.containers.get(&high) }

    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics::default();
        for container in self.containers.values() {
            stats.containers += 1;
            if container.is_sparse() { stats.sparse_containers += 1; } else { stats.dense_containers += 1; }
            stats.cardinality += container.cardinality() as u64;
            stats.heap_bytes += container.heap_size().0;
        }
        stats
    }
}

impl Clear for Bitmap {
    #[inline(always)] fn clear(&mut self) { Bitmap::clear(self) }
}

impl HeapSize for Bitmap {
    fn heap_size(&self) -> (usize, usize) {
        let mut l = 0;
        let mut c = 0;
        for container in self.containers.values() {
            let (cl, cc) = container.heap_size();
            l += cl;
            c += cc;
        }
        (l, c)
    }
}

impl FromIterator<u32> for Bitmap {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut bitmap = Bitmap::new();
        bitmap.extend(iter);
        bitmap
    }
}

impl Extend<u32> for Bitmap {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<'a> IntoIterator for &'a Bitmap {
    type Item = u32;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// Ascending iterator over the values of a [`Bitmap`].
pub struct Iter<'a> {
    containers: std::collections::btree_map::Iter<'a, u16, Container>,
    current: Option<(u16, container::Iter<'a>)>,
}

impl Iterator for Iter<'_> {
    type Item = u32;
    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some((high, lows)) = &mut self.current {
                if let Some(low) = lows.next() {
                    return Some(join(*high, low));
                }
            }
            let (high, container) = self.containers.next()?;
            self.current = Some((*high, container.iter()));
        }
    }
}

#[cfg(feature = "serde")]
mod raw {
    use std::collections::BTreeMap;

    use crate::container::Container;
    use crate::error::{BitmapError, Result};

    #[derive(serde::Deserialize)]
    pub struct Bitmap {
        containers: BTreeMap<u16, Container>,
    }

    impl TryFrom<Bitmap> for super::Bitmap {
        type Error = BitmapError;
        fn try_from(raw: Bitmap) -> Result<Self> {
            if let Some(key) = raw.containers.iter().find(|(_, c)| c.cardinality() == 0).map(|(k, _)| *k) {
                return Err(BitmapError::EmptyContainer { key });
            }
            Ok(super::Bitmap { containers: raw.containers })
        }
    }
}

#[cfg(test)]
mod test {
    use super::Bitmap;
    use crate::constants::SPARSE_THRESHOLD;
    use crate::Clear;

    #[test]
    fn add_contains_cardinality() {
        let mut bitmap = Bitmap::new();
        assert!(bitmap.add(5));
        assert!(!bitmap.add(5));
        assert_eq!(bitmap.cardinality(), 1);
        assert!(bitmap.contains(5));
        assert!(!bitmap.contains(6));
        assert!(!bitmap.contains(5 + (1 << 16)));

        bitmap.add(u32::MAX);
        bitmap.add(0);
        assert_eq!(bitmap.cardinality(), 3);
        assert_eq!(bitmap.container_count(), 2);
        assert_eq!(bitmap.min(), Some(0));
        assert_eq!(bitmap.max(), Some(u32::MAX));
    }

    #[test]
    fn containers_created_lazily() {
        let mut bitmap = Bitmap::new();
        assert!(!bitmap.contains(70000));
        assert_eq!(bitmap.container_count(), 0);
        bitmap.add(70000);
        assert_eq!(bitmap.container_count(), 1);
        assert!(bitmap.container(1).is_some());
        assert!(bitmap.container(0).is_none());
    }

    #[test]
    fn conversion_is_transparent() {
        let base = 7u32 << 16;
        let mut bitmap = Bitmap::new();
        for i in 0 .. SPARSE_THRESHOLD as u32 - 1 {
            bitmap.add(base + i * 3);
        }
        assert!(bitmap.container(7).unwrap().is_sparse());
        bitmap.add(base + 1);
        assert!(bitmap.container(7).unwrap().is_dense());
        bitmap.add(base + 2);

        for i in 0 .. SPARSE_THRESHOLD as u32 - 1 {
            assert!(bitmap.contains(base + i * 3));
        }
        assert!(bitmap.contains(base + 1) && bitmap.contains(base + 2));
        assert!(!bitmap.contains(base + 4));
        assert_eq!(bitmap.cardinality(), SPARSE_THRESHOLD as u64 + 1);
    }

    #[test]
    fn remove_drops_empty_containers() {
        let mut bitmap: Bitmap = [1, 2, 1 << 20].into_iter().collect();
        assert!(bitmap.remove(1 << 20));
        assert!(!bitmap.remove(1 << 20));
        assert_eq!(bitmap.container_count(), 1);
        bitmap.remove(1);
        bitmap.remove(2);
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.min(), None);
    }

    #[test]
    fn clear_resets() {
        let mut bitmap: Bitmap = (0 .. 100_000).step_by(7).collect();
        assert!(!bitmap.is_empty());
        Clear::clear(&mut bitmap);
        assert_eq!(bitmap.cardinality(), 0);
        assert!(!bitmap.contains(0) && !bitmap.contains(7));
        assert_eq!(bitmap.container_count(), 0);
    }

    #[test]
    fn iterates_in_order() {
        let values = vec![3, 70000, 1 << 31, 5, 65536, u32::MAX];
        let bitmap: Bitmap = values.iter().copied().collect();
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(bitmap.iter().collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn statistics() {
        let mut bitmap: Bitmap = (0 .. 5000).collect();
        bitmap.add(1 << 16);
        let stats = bitmap.statistics();
        assert_eq!(stats.containers, 2);
        assert_eq!(stats.dense_containers, 1);
        assert_eq!(stats.sparse_containers, 1);
        assert_eq!(stats.cardinality, 5001);
        assert!(stats.heap_bytes >= 8192 + 2);
    }
}
