//! Sizing constants shared by the container representations.
//!
//! A sparse entry costs two bytes, while a dense container costs a fixed
//! `DENSE_BITS / 8 = 8192` bytes whatever its occupancy. The two break even at
//! `8192 / 2 = 4096` entries, which is where a sparse container turns dense.

/// Number of bits in one storage word of a dense container.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Number of distinct low values a container can hold, one bit each when dense.
pub const DENSE_BITS: usize = 1 << 16;

/// Number of `u64` words backing a dense container.
pub const DENSE_WORDS: usize = DENSE_BITS / WORD_BITS;

/// Occupancy at which a sparse container converts to dense.
///
/// A sparse container always holds strictly fewer than this many values.
pub const SPARSE_THRESHOLD: usize = DENSE_BITS / 8 / std::mem::size_of::<u16>();

/// Splits a value into its high prefix (the container key) and low value.
#[inline(always)]
pub fn split(value: u32) -> (u16, u16) {
    ((value >> 16) as u16, (value & 0xFFFF) as u16)
}

/// Reassembles a value from its high prefix and low value.
#[inline(always)]
pub fn join(high: u16, low: u16) -> u32 {
    ((high as u32) << 16) | low as u32
}
