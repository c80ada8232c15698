//! Common traits and types that are re-used throughout the crate.

/// A type with a length.
pub trait Len {
    /// The number of contained elements.
    fn len(&self) -> usize;
    /// Whether this contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A type that can remove its contents and return to an empty state.
pub trait Clear {
    /// Removes all contents from `self`.
    fn clear(&mut self);
}

pub trait HeapSize {
    /// Active (len) and allocated (cap) heap sizes in bytes.
    /// This should not include the size of `self` itself.
    fn heap_size(&self) -> (usize, usize) { (0, 0) }
}

macro_rules! implement_heap_size {
    ($($index_type:ty),*) => { $(
        impl HeapSize for $index_type { }
    )* }
}

implement_heap_size!(u16, u64);

impl<T: HeapSize> HeapSize for Vec<T> {
    fn heap_size(&self) -> (usize, usize) {
        let mut l = std::mem::size_of::<T>() * self.len();
        let mut c = std::mem::size_of::<T>() * self.capacity();
        for item in (self[..]).iter() {
            let (il, ic) = item.heap_size();
            l += il;
            c += ic;
        }
        (l, c)
    }
}
impl<T: HeapSize + ?Sized> HeapSize for Box<T> {
    fn heap_size(&self) -> (usize, usize) {
        // A box's contents live entirely on the heap.
        let size = std::mem::size_of_val(&**self);
        let (l, c) = (**self).heap_size();
        (size + l, size + c)
    }
}
impl<T: HeapSize, const N: usize> HeapSize for [T; N] {
    fn heap_size(&self) -> (usize, usize) {
        let mut l = 0;
        let mut c = 0;
        for item in self.iter() {
            let (il, ic) = item.heap_size();
            l += il;
            c += ic;
        }
        (l, c)
    }
}
