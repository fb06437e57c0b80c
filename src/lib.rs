//! # cootensor
//!
//! `cootensor` manipulates sparse (coordinate-format) tensors whose non-zero
//! entries are addressed by multi-dimensional integer indices. Each
//! multi-index is packed into a single machine word using per-dimension bit
//! fields (see [`desc::Descriptor`]), and a parallel, multi-pass LSD radix
//! sort ([`sort`]) reorders entries by one or more chosen dimensions,
//! producing a [`perm::Permutation`] the caller can apply to any parallel
//! array (values, weights, auxiliary keys).
//!
//! ## Layout
//!
//! - [`desc`] — the bit-packing layout ([`desc::Descriptor`]) and its
//!   pack/unpack/extract/insert primitives.
//! - [`packed`] / [`unpacked`] — the two multi-index array representations.
//! - [`perm`] — permutations and how to apply them.
//! - [`part`] — splitting a (possibly pre-sorted) index array into contiguous
//!   parts.
//! - [`sort`] — the parallel LSD radix sorter, the hardest engineering here.
//! - [`freq`] / [`view`] — per-dimension histograms and cached sort views.
//! - [`sample`] — pseudorandom distinct multi-indices and element arrays.
//! - [`disk`] — a small self-describing blob format for saving/loading arrays.
//! - [`distribute`] — mesh/multi-partition bookkeeping for scattering a
//!   tensor's rows across worker slots.
//! - [`tensor`] — the descriptor+indices+values convenience aggregate.
//!
//! ## Word and element width
//!
//! The packed-word width is fixed at compile time via the `word32`/`word64`
//! Cargo features (default `word64`), and the element float width via
//! `elem32`/`elem64` (default `elem64`). [`Word`] and [`Elem`] always refer
//! to whichever width is active.
//!
//! ## Example
//!
//! ```
//! use cootensor::prelude::*;
//!
//! let desc = Descriptor::build(&[12, 5, 2]).unwrap();
//! let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
//! let mut indx = PackedIndex::from_rows(&desc, rows).unwrap();
//! let mut perm = Permutation::identity(indx.len());
//!
//! sort::sort(&desc, &[0, 1], &mut indx, Some(&mut perm), SortOptions::default()).unwrap();
//!
//! let elements = vec![0.10_f64, 0.20, 0.30, 0.40];
//! let sorted_elements = perm.apply(&elements);
//! assert_eq!(sorted_elements, vec![0.30, 0.20, 0.10, 0.40]);
//! ```

#[cfg(all(feature = "word32", feature = "word64"))]
compile_error!("features `word32` and `word64` are mutually exclusive");
#[cfg(all(feature = "elem32", feature = "elem64"))]
compile_error!("features `elem32` and `elem64` are mutually exclusive");

/// The machine word used to store packed multi-indices, permutation
/// entries and counts. Fixed at compile time by the `word32`/`word64`
/// Cargo features (default `word64`).
#[cfg(feature = "word32")]
pub type Word = u32;
#[cfg(not(feature = "word32"))]
pub type Word = u64;

/// The floating-point width used for tensor element values. Fixed at
/// compile time by the `elem32`/`elem64` Cargo features (default `elem64`).
#[cfg(feature = "elem32")]
pub type Elem = f32;
#[cfg(not(feature = "elem32"))]
pub type Elem = f64;

/// Number of bits in [`Word`]; also the maximum supported tensor order,
/// since a dimension of width 1 bit still costs at least one bit of the
/// packed word.
pub const WORD_BITS: u32 = Word::BITS;

/// Maximum supported tensor order (number of dimensions), equal to the
/// packed word's bit width.
pub const MAX_ORDER: usize = WORD_BITS as usize;

pub mod desc;
pub mod disk;
pub mod distribute;
pub mod error;
pub mod freq;
pub mod packed;
pub mod part;
pub mod perm;
pub mod sample;
pub mod sort;
pub mod tensor;
pub mod unpacked;
pub mod view;

pub use desc::Descriptor;
pub use error::{Error, Result};
pub use freq::Frequency;
pub use packed::PackedIndex;
pub use part::Partition;
pub use perm::Permutation;
pub use sort::SortOptions;
pub use tensor::Tensor;
pub use unpacked::UnpackedIndex;
pub use view::View;

/// Re-exports the common entry points needed to build a descriptor, pack
/// rows, sort them and apply the resulting permutation.
pub mod prelude {
    pub use crate::desc::Descriptor;
    pub use crate::error::{Error, Result};
    pub use crate::freq::Frequency;
    pub use crate::packed::PackedIndex;
    pub use crate::part::Partition;
    pub use crate::perm::Permutation;
    pub use crate::sort::{self, SortOptions};
    pub use crate::tensor::Tensor;
    pub use crate::unpacked::UnpackedIndex;
    pub use crate::view::View;
    pub use crate::{Elem, Word};
}
