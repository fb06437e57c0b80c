//! The convenience aggregate bundling a descriptor, packed indices and
//! parallel element values.

use rand::Rng;

use crate::desc::Descriptor;
use crate::error::{Error, Result};
use crate::packed::PackedIndex;
use crate::perm::Permutation;
use crate::sample;
use crate::sort::{self, SortOptions};
use crate::Elem;

/// A sparse tensor: a [`Descriptor`], a [`PackedIndex`] of non-zero
/// locations, and a parallel array of values, kept in lockstep by every
/// operation here.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub desc: Descriptor,
    pub indx: PackedIndex,
    pub elem: Vec<Elem>,
}

impl Tensor {
    /// Builds a tensor from matching index and element arrays.
    ///
    /// Fails with [`Error::BadInput`] if `indx.len() != elem.len()`.
    pub fn new(desc: Descriptor, indx: PackedIndex, elem: Vec<Elem>) -> Result<Self> {
        if indx.len() != elem.len() {
            return Err(Error::bad_input(format!(
                "index array has {} rows but element array has {}",
                indx.len(),
                elem.len()
            )));
        }
        Ok(Tensor { desc, indx, elem })
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.indx.len()
    }

    /// Whether the tensor has no entries.
    pub fn is_empty(&self) -> bool {
        self.indx.is_empty()
    }

    /// Builds a tensor of `count` pairwise-distinct random locations over
    /// `desc`'s domain, with independently drawn uniform `[0, 1)` values.
    pub fn sample<R: Rng + ?Sized>(desc: Descriptor, count: usize, rng: &mut R) -> Result<Self> {
        let indx = sample::sample_distinct(&desc, count, rng)?;
        let elem = sample::sample_elements(count, rng);
        Tensor::new(desc, indx, elem)
    }

    /// Applies a uniformly random permutation to `indx` and `elem` in
    /// lockstep, leaving the entry set unchanged but its order randomized.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let perm = sample::random_permutation(self.len(), rng);
        self.apply_permutation(&perm)
    }

    /// Sorts entries by `dim` alone, permuting `elem` to match.
    pub fn sort_by_dim(&mut self, dim: usize, opts: SortOptions) -> Result<()> {
        let mut perm = Permutation::identity(self.len());
        sort::sort(&self.desc, &[dim], &mut self.indx, Some(&mut perm), opts)?;
        perm.apply_in_place(&mut self.elem)
    }

    fn apply_permutation(&mut self, perm: &Permutation) -> Result<()> {
        perm.apply_in_place(self.indx.as_mut_slice())?;
        perm.apply_in_place(&mut self.elem)
    }
}
