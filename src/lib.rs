//! Compressed sets of `u32` values.
//!
//! Values are bucketed by their upper 16 bits. Each bucket is a [`Container`]
//! holding the lower 16 bits, either as a sorted list of distinct values while
//! it is small, or as a 65536-bit vector once it would hold
//! [`SPARSE_THRESHOLD`](constants::SPARSE_THRESHOLD) values. Sorted lists cost
//! two bytes a value and the bit vector a fixed 8192 bytes, so the switch
//! happens where the two break even.
//!
//! ```
//! use roaring_lite::Bitmap;
//!
//! let a: Bitmap = (0 .. 1000).step_by(2).collect();
//! let b: Bitmap = (500 .. 1500).step_by(3).collect();
//!
//! let union = a.union_with(&b);
//! assert!(union.contains(100));
//! assert!(!union.contains(101));
//!
//! let both = a.intersect_with(&b);
//! assert!(both.iter().all(|x| x % 6 == 2));
//! ```

pub mod algebra;
pub mod bitmap;
pub mod common;
pub mod constants;
pub mod container;
pub mod dense;
pub mod error;

pub use bitmap::{Bitmap, Statistics};
pub use common::{Clear, HeapSize, Len};
pub use container::Container;
pub use dense::Dense;
pub use error::{BitmapError, Result};
