//! A row-major array of plain (unpacked) coordinates.

use crate::desc::Descriptor;
use crate::error::{Error, Result};
use crate::packed::PackedIndex;
use crate::Word;

/// A contiguous `len * order` matrix of coordinates, row-major.
///
/// Purely a convenience view for I/O and printing; lossless against
/// [`PackedIndex`] as long as every coordinate is within bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnpackedIndex {
    v: Vec<Word>,
    order: usize,
}

impl UnpackedIndex {
    /// A zeroed unpacked array for `len` rows of `desc.order()` coordinates.
    pub fn zeros(desc: &Descriptor, len: usize) -> Self {
        UnpackedIndex {
            v: vec![0; len * desc.order()],
            order: desc.order(),
        }
    }

    /// Wraps an already-unpacked row-major buffer directly. `v.len()` must
    /// be a multiple of `order`.
    pub fn from_raw(v: Vec<Word>, order: usize) -> Self {
        UnpackedIndex { v, order }
    }

    /// Unpacks a [`PackedIndex`] into plain coordinates.
    pub fn from_packed(desc: &Descriptor, indx: &PackedIndex) -> Self {
        let mut out = UnpackedIndex::zeros(desc, indx.len());
        indx.unpack_into(desc, &mut out.v);
        out
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        if self.order == 0 {
            0
        } else {
            self.v.len() / self.order
        }
    }

    /// Whether the array has no rows.
    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Number of coordinates per row.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Extracts the coordinate of dimension `dim` at row `i`.
    #[inline]
    pub fn extract(&self, i: usize, dim: usize) -> Word {
        self.v[i * self.order + dim]
    }

    /// Writes `value` into dimension `dim` at row `i`.
    #[inline]
    pub fn insert(&mut self, i: usize, dim: usize, value: Word) {
        self.v[i * self.order + dim] = value;
    }

    /// Borrows the underlying row-major buffer.
    pub fn as_slice(&self) -> &[Word] {
        &self.v
    }

    /// Packs this array back into a [`PackedIndex`].
    pub fn pack(&self, desc: &Descriptor) -> Result<PackedIndex> {
        if desc.order() != self.order {
            return Err(Error::bad_input(format!(
                "descriptor order {} does not match unpacked order {}",
                desc.order(),
                self.order
            )));
        }
        let len = self.len();
        let mut packed = PackedIndex::zeros(len);
        for i in 0..len {
            let row = &self.v[i * self.order..(i + 1) * self.order];
            packed.set(i, desc.pack_one(row)?);
        }
        Ok(packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_packed() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
        let packed = PackedIndex::from_rows(&desc, rows).unwrap();
        let unpacked = UnpackedIndex::from_packed(&desc, &packed);
        assert_eq!(unpacked.len(), 4);
        let repacked = unpacked.pack(&desc).unwrap();
        assert_eq!(repacked, packed);
    }

    #[test]
    fn extract_and_insert() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let mut unpacked = UnpackedIndex::zeros(&desc, 2);
        unpacked.insert(0, 0, 4);
        unpacked.insert(0, 1, 3);
        unpacked.insert(0, 2, 0);
        assert_eq!(unpacked.extract(0, 0), 4);
        assert_eq!(unpacked.extract(0, 1), 3);
    }
}
