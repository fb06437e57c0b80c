//! Pseudorandom distinct multi-indices and element arrays.
//!
//! Mirrors the original's two named sampling strategies
//! (`rock_indx_sample_shuffle_take` / `rock_indx_sample_sort_discard`),
//! auto-selected by the ratio of requested rows to domain size rather than
//! requiring the caller to pick. Resolves the open question about
//! `rock_uint_random`'s documented 64-bit failure mode by drawing every
//! bounded integer through `rand`'s own unbiased [`Rng::random_range`],
//! which works uniformly for both the 32- and 64-bit `Word`.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::desc::Descriptor;
use crate::error::{Error, Result};
use crate::packed::PackedIndex;
use crate::perm::Permutation;
use crate::{Elem, Word};

/// Above this fraction of the domain, sampling shuffles the whole domain
/// and takes a prefix; below it, rejection sampling against a `HashSet` of
/// already-drawn values is cheaper.
const SHUFFLE_TAKE_RATIO: f64 = 0.5;

/// Draws `count` pairwise-distinct packed multi-indices, uniformly over
/// the descriptor's `0..total_size` domain.
///
/// Fails with [`Error::BadInput`] if `count` exceeds `desc.total_size()`.
pub fn sample_distinct<R: Rng + ?Sized>(desc: &Descriptor, count: usize, rng: &mut R) -> Result<PackedIndex> {
    let total = desc.total_size();
    if (count as u128) > (total as u128) {
        return Err(Error::bad_input(
            "sample count exceeds the descriptor's total_size",
        ));
    }
    if count == 0 {
        return Ok(PackedIndex::zeros(0));
    }

    let ratio = count as f64 / total as f64;
    let values = if ratio > SHUFFLE_TAKE_RATIO {
        sample_distinct_shuffle_take(total, count, rng)
    } else {
        sample_distinct_rejection(total, count, rng)
    };

    let mut indx = PackedIndex::zeros(count);
    for (i, &val) in values.iter().enumerate() {
        let mut remaining = val;
        for dim in 0..desc.order() {
            let dim_size = desc.dim_size(dim);
            let coord = remaining % dim_size;
            remaining /= dim_size;
            indx.insert(desc, i, dim, coord)?;
        }
    }
    Ok(indx)
}

/// Fast, but requires the whole `0..total` domain to fit in memory as a
/// `Vec<Word>` -- suitable when `count` is a large fraction of `total`.
fn sample_distinct_shuffle_take<R: Rng + ?Sized>(total: Word, count: usize, rng: &mut R) -> Vec<Word> {
    let mut pool: Vec<Word> = (0..total).collect();
    let (chosen, _) = pool.partial_shuffle(rng, count);
    chosen.to_vec()
}

/// Does not require the whole domain to fit in memory; costly when `count`
/// approaches `total` since collisions become frequent.
fn sample_distinct_rejection<R: Rng + ?Sized>(total: Word, count: usize, rng: &mut R) -> Vec<Word> {
    let mut seen = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let v = rng.random_range(0..total);
        if seen.insert(v) {
            out.push(v);
        }
    }
    out
}

/// Draws `len` uniform values in `[0, 1)`.
pub fn sample_elements<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<Elem> {
    (0..len).map(|_| rng.random::<Elem>()).collect()
}

/// Draws a uniformly random permutation of `0..len`, by Fisher-Yates
/// shuffling the identity permutation.
pub fn random_permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Permutation {
    let mut v: Vec<usize> = (0..len).collect();
    v.shuffle(rng);
    Permutation::from_vec(v)
}
