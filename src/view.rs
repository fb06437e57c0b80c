//! Cached per-dimension sort permutations into an index array.

use crate::desc::Descriptor;
use crate::error::Result;
use crate::packed::PackedIndex;
use crate::perm::Permutation;
use crate::sort::{self, SortOptions};

/// One [`Permutation`] per dimension of a [`Descriptor`]: applying
/// `permutation(i)` to the associated [`PackedIndex`] yields the array
/// sorted on dimension `i` alone, without mutating the original array.
///
/// Borrows its descriptor and index array; neither may outlive the view.
pub struct View<'a> {
    desc: &'a Descriptor,
    indx: &'a PackedIndex,
    sorted_dim: Option<usize>,
    dim_perm: Vec<Permutation>,
}

impl<'a> View<'a> {
    /// Builds a view of `indx`. If `sorted_dim` is `Some(d)`, the caller
    /// asserts `indx` is already sorted on dimension `d`; that dimension's
    /// permutation is the identity. Every other dimension's permutation is
    /// computed by sorting a throwaway copy of `indx`, which is otherwise
    /// left untouched.
    pub fn build(desc: &'a Descriptor, indx: &'a PackedIndex, sorted_dim: Option<usize>) -> Result<Self> {
        let mut dim_perm = Vec::with_capacity(desc.order());

        for dim in 0..desc.order() {
            if Some(dim) == sorted_dim {
                dim_perm.push(Permutation::identity(indx.len()));
                continue;
            }

            let mut copy = indx.clone();
            let mut perm = Permutation::identity(indx.len());
            sort::sort(desc, &[dim], &mut copy, Some(&mut perm), SortOptions::default())?;
            dim_perm.push(perm);
        }

        Ok(View {
            desc,
            indx,
            sorted_dim,
            dim_perm,
        })
    }

    /// The descriptor this view was built against.
    pub fn descriptor(&self) -> &Descriptor {
        self.desc
    }

    /// The index array this view was built from.
    pub fn index(&self) -> &PackedIndex {
        self.indx
    }

    /// The dimension the caller asserted was already sorted, if any.
    pub fn sorted_dim(&self) -> Option<usize> {
        self.sorted_dim
    }

    /// The permutation that sorts the associated index array on `dim`.
    pub fn permutation(&self, dim: usize) -> &Permutation {
        &self.dim_perm[dim]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Word;

    #[test]
    fn sorted_dim_gets_identity_permutation() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[0, 5, 1], [4, 1, 1], [4, 3, 0], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();

        let view = View::build(&desc, &indx, Some(0)).unwrap();
        assert_eq!(view.permutation(0), &Permutation::identity(indx.len()));
    }

    #[test]
    fn every_dimension_permutation_sorts_on_that_dimension() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
        let original = PackedIndex::from_rows(&desc, rows).unwrap();

        let view = View::build(&desc, &original, None).unwrap();

        for dim in 0..desc.order() {
            let perm = view.permutation(dim);
            let reordered = perm.apply(original.as_slice());
            let mut prev = None;
            for &word in &reordered {
                let coord = desc.extract(word, dim);
                if let Some(p) = prev {
                    assert!(p <= coord);
                }
                prev = Some(coord);
            }
        }

        // The original array is untouched.
        assert_eq!(view.index(), &original);
    }
}
