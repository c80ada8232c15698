//! Errors raised when raw parts are turned into containers or bitmaps.
//!
//! Adding and querying values never fails; these only guard the places where
//! externally supplied lists, words or maps enter the crate.

use thiserror::Error;

/// Errors describing raw data that would break a representation invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitmapError {
    /// Sparse values must be strictly ascending.
    #[error("sparse values not strictly ascending at position {position}: {previous} then {value}")]
    UnsortedSparse {
        /// Position of the offending value.
        position: usize,
        /// The value preceding it.
        previous: u16,
        /// The offending value.
        value: u16,
    },

    /// A sparse list must hold fewer values than the conversion threshold.
    #[error("sparse container holds {len} values, the limit is {limit}")]
    OversizedSparse {
        /// Number of values supplied.
        len: usize,
        /// Exclusive upper bound on sparse length.
        limit: usize,
    },

    /// A dense vector must have exactly the expected number of words.
    #[error("dense container has {words} words, expected {expected}")]
    DenseWidth {
        /// Number of words supplied.
        words: usize,
        /// Required number of words.
        expected: usize,
    },

    /// Bitmaps never store a container without members.
    #[error("empty container stored under key {key}")]
    EmptyContainer {
        /// The high prefix of the empty container.
        key: u16,
    },
}

/// A specialized `Result` for fallible bitmap construction.
pub type Result<T> = std::result::Result<T, BitmapError>;
