//! An array of bit-packed multi-indices.

use crate::desc::Descriptor;
use crate::error::{Error, Result};
use crate::Word;

/// A dense sequence of packed multi-index words.
///
/// Owned by the caller and freely mutated: sorted, permuted, or edited
/// field-by-field via [`Descriptor::insert`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedIndex {
    v: Vec<Word>,
}

impl PackedIndex {
    /// An index array of `len` zeroed words.
    pub fn zeros(len: usize) -> Self {
        PackedIndex { v: vec![0; len] }
    }

    /// Wraps an already-packed `Vec<Word>` directly.
    pub fn from_words(v: Vec<Word>) -> Self {
        PackedIndex { v }
    }

    /// Packs an array of coordinate tuples (one row per multi-index).
    pub fn from_rows<const N: usize>(desc: &Descriptor, rows: &[[Word; N]]) -> Result<Self> {
        if desc.order() != N {
            return Err(Error::bad_input(format!(
                "descriptor order {} does not match row width {N}",
                desc.order()
            )));
        }
        let mut v = Vec::with_capacity(rows.len());
        for row in rows {
            v.push(desc.pack_one(row)?);
        }
        Ok(PackedIndex { v })
    }

    /// Number of packed rows.
    pub fn len(&self) -> usize {
        self.v.len()
    }

    /// Whether the array has no rows.
    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// The raw packed word at row `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Word {
        self.v[i]
    }

    /// Overwrites the raw packed word at row `i`.
    #[inline]
    pub fn set(&mut self, i: usize, val: Word) {
        self.v[i] = val;
    }

    /// Extracts the coordinate of dimension `dim` at row `i`.
    #[inline]
    pub fn extract(&self, desc: &Descriptor, i: usize, dim: usize) -> Word {
        desc.extract(self.v[i], dim)
    }

    /// Writes `value` into dimension `dim` at row `i`.
    pub fn insert(&mut self, desc: &Descriptor, i: usize, dim: usize, value: Word) -> Result<()> {
        desc.insert(&mut self.v[i], dim, value)
    }

    /// Borrows the underlying packed words.
    pub fn as_slice(&self) -> &[Word] {
        &self.v
    }

    /// Mutably borrows the underlying packed words.
    pub fn as_mut_slice(&mut self) -> &mut [Word] {
        &mut self.v
    }

    /// Unpacks every row into `out`, a row-major buffer of
    /// `self.len() * desc.order()` coordinates.
    pub fn unpack_into(&self, desc: &Descriptor, out: &mut [Word]) {
        for (i, &word) in self.v.iter().enumerate() {
            desc.unpack_one(word, &mut out[i * desc.order()..(i + 1) * desc.order()]);
        }
    }
}

impl From<Vec<Word>> for PackedIndex {
    fn from(v: Vec<Word>) -> Self {
        PackedIndex { v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_and_extract_round_trip() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();
        assert_eq!(indx.len(), 4);
        for (i, row) in rows.iter().enumerate() {
            for (dim, &coord) in row.iter().enumerate() {
                assert_eq!(indx.extract(&desc, i, dim), coord);
            }
        }
    }

    #[test]
    fn unpack_into_matches_rows() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();
        let mut out = vec![0 as Word; rows.len() * 3];
        indx.unpack_into(&desc, &mut out);
        assert_eq!(out, vec![4, 3, 0, 9, 1, 0]);
    }
}
