//! Mesh, multi-partition and local (non-MPI) scatter/gather.
//!
//! A single-process stand-in for the original's MPI-backed distribution
//! layer: `Mesh`/`MultiPartition`/`Distribution` compute exactly the same
//! partition assignment the original does, but `scatter_*`/`gather_*` here
//! just group and reassemble `Vec`s in memory rather than moving bytes
//! across ranks.

use crate::desc::Descriptor;
use crate::error::{Error, Result};
use crate::packed::PackedIndex;
use crate::part::Partition;
use crate::{Elem, Word};

/// A logical grid of worker slots, `np = Π dim_size[i]` total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    dim_size: Vec<usize>,
    np: usize,
}

impl Mesh {
    /// Builds a mesh of the given per-dimension slot counts.
    pub fn new(dim_size: &[usize]) -> Result<Self> {
        if dim_size.is_empty() {
            return Err(Error::bad_input("mesh must have at least one dimension"));
        }
        if dim_size.iter().any(|&d| d == 0) {
            return Err(Error::bad_input("mesh dimension size must be at least 1"));
        }
        let np = dim_size.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| Error::bad_input("mesh slot count overflows usize"))?;
        Ok(Mesh {
            dim_size: dim_size.to_vec(),
            np,
        })
    }

    /// Number of mesh dimensions.
    pub fn order(&self) -> usize {
        self.dim_size.len()
    }

    /// Size of mesh dimension `dim`.
    pub fn dim_size(&self, dim: usize) -> usize {
        self.dim_size[dim]
    }

    /// Total number of worker slots.
    pub fn np(&self) -> usize {
        self.np
    }
}

/// One space-based [`Partition`] per partitioned tensor dimension, together
/// with which tensor dimension each one partitions.
#[derive(Debug, Clone)]
pub struct MultiPartition {
    dim_num: Vec<usize>,
    dim_part: Vec<Partition>,
}

impl MultiPartition {
    /// Builds a multi-partition over `desc`. The first `num_prio_dims`
    /// entries of `num_parts` partition `prio_dims[0..num_prio_dims]`, in
    /// order; remaining entries partition the largest not-yet-partitioned
    /// dimension of `desc` (ties broken toward the lower dimension index).
    pub fn from_descriptor(
        desc: &Descriptor,
        num_parts: &[usize],
        num_prio_dims: usize,
        prio_dims: &[usize],
    ) -> Result<Self> {
        let order = num_parts.len();
        if order == 0 {
            return Err(Error::bad_input("multi-partition must have at least one dimension"));
        }
        if order > desc.order() {
            return Err(Error::bad_input(format!(
                "multi-partition order {order} exceeds descriptor order {}",
                desc.order()
            )));
        }
        if num_prio_dims > prio_dims.len() {
            return Err(Error::bad_input(
                "num_prio_dims exceeds the length of prio_dims",
            ));
        }

        let mut dim_num = Vec::with_capacity(order);
        let mut dim_part = Vec::with_capacity(order);

        for i in 0..order {
            let dn = if i < num_prio_dims {
                prio_dims[i]
            } else {
                largest_remaining_dim(desc, &dim_num).ok_or_else(|| {
                    Error::bad_input("no remaining dimensions to partition")
                })?
            };
            dim_part.push(Partition::by_space(desc, dn, num_parts[i])?);
            dim_num.push(dn);
        }

        log::debug!(
            "built multi-partition over dims {dim_num:?} with {} total parts",
            dim_part.iter().map(Partition::num_parts).product::<usize>()
        );

        Ok(MultiPartition { dim_num, dim_part })
    }

    /// Number of partitioned dimensions.
    pub fn order(&self) -> usize {
        self.dim_num.len()
    }

    /// The tensor dimension that the `j`-th partition covers.
    pub fn dim_num(&self, j: usize) -> usize {
        self.dim_num[j]
    }

    /// The `j`-th per-dimension partition.
    pub fn dim_part(&self, j: usize) -> &Partition {
        &self.dim_part[j]
    }

    /// Product of every dimension's part count: the size of the logical
    /// grid this multi-partition describes.
    pub fn total_parts(&self) -> usize {
        self.dim_part.iter().map(Partition::num_parts).product()
    }

    fn part_index_for(&self, j: usize, coord: Word) -> usize {
        let offsets = self.dim_part[j].offsets();
        let mut k = 0;
        while coord as usize >= offsets[k + 1] {
            k += 1;
        }
        k
    }
}

/// The largest-`dim_size` dimension of `desc` not already listed in
/// `assigned`. Ties are broken toward the lower dimension index (only a
/// strictly larger candidate replaces the current pick).
fn largest_remaining_dim(desc: &Descriptor, assigned: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for i in 0..desc.order() {
        if assigned.contains(&i) {
            continue;
        }
        best = Some(match best {
            None => i,
            Some(b) => {
                if desc.dim_size(b) < desc.dim_size(i) {
                    i
                } else {
                    b
                }
            }
        });
    }
    best
}

/// The destination part of row `i`, as a row-major linearization of the
/// multi-partition grid: `Σ_j (Π_{k<j} num_parts_k) · part_index_j(coord_j)`.
pub fn part_num_from_mpart(mpart: &MultiPartition, desc: &Descriptor, indx: &PackedIndex, i: usize) -> usize {
    let mut part_num = 0usize;
    let mut prev_prod = 1usize;
    for j in 0..mpart.order() {
        let coord = indx.extract(desc, i, mpart.dim_num(j));
        let part_idx = mpart.part_index_for(j, coord);
        part_num += prev_prod * part_idx;
        prev_prod *= mpart.dim_part(j).num_parts();
    }
    part_num
}

/// Precomputed per-slot row counts and the stable grouping of row indices
/// by assigned mesh slot.
#[derive(Debug, Clone)]
pub struct Distribution {
    counts: Vec<usize>,
    offsets: Vec<usize>,
    rows: Vec<usize>,
}

impl Distribution {
    /// Computes, for every row of `indx`, which mesh slot it belongs to
    /// (via [`part_num_from_mpart`]), and groups row indices by slot in
    /// their original relative order.
    ///
    /// Fails with [`Error::BadInput`] if `mpart.total_parts() != mesh.np()`.
    pub fn new(mesh: &Mesh, mpart: &MultiPartition, desc: &Descriptor, indx: &PackedIndex) -> Result<Self> {
        if mpart.total_parts() != mesh.np() {
            return Err(Error::bad_input(format!(
                "multi-partition describes {} parts but mesh has {} slots",
                mpart.total_parts(),
                mesh.np()
            )));
        }

        let np = mesh.np();
        let mut counts = vec![0usize; np];
        let mut slot_of_row = Vec::with_capacity(indx.len());
        for i in 0..indx.len() {
            let slot = part_num_from_mpart(mpart, desc, indx, i);
            counts[slot] += 1;
            slot_of_row.push(slot);
        }

        let mut offsets = vec![0usize; np + 1];
        for s in 0..np {
            offsets[s + 1] = offsets[s] + counts[s];
        }

        let mut cursor = offsets.clone();
        let mut rows = vec![0usize; indx.len()];
        for (i, &slot) in slot_of_row.iter().enumerate() {
            rows[cursor[slot]] = i;
            cursor[slot] += 1;
        }

        log::debug!(
            "distributed {} rows across {np} mesh slots, counts={counts:?}",
            indx.len()
        );

        Ok(Distribution { counts, offsets, rows })
    }

    /// Number of rows assigned to each mesh slot.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Offsets into [`Distribution::rows`] per slot; `offsets().len() == counts().len() + 1`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Original row indices assigned to `slot`, in their original relative order.
    pub fn slot_rows(&self, slot: usize) -> &[usize] {
        &self.rows[self.offsets[slot]..self.offsets[slot + 1]]
    }

    /// Total number of rows across every slot.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Splits `indx` into one [`PackedIndex`] per mesh slot, in the order
/// `dist` assigned them.
pub fn scatter_indx(dist: &Distribution, indx: &PackedIndex) -> Vec<PackedIndex> {
    (0..dist.counts.len())
        .map(|slot| {
            let rows = dist.slot_rows(slot);
            let mut out = PackedIndex::zeros(rows.len());
            for (j, &r) in rows.iter().enumerate() {
                out.set(j, indx.get(r));
            }
            out
        })
        .collect()
}

/// Reassembles the per-slot index arrays scattered by [`scatter_indx`] back
/// into their original row order.
pub fn gather_indx(dist: &Distribution, parts: &[PackedIndex]) -> Result<PackedIndex> {
    if parts.len() != dist.counts.len() {
        return Err(Error::bad_input("expected one part per mesh slot"));
    }
    let mut out = PackedIndex::zeros(dist.total_rows());
    for (slot, part) in parts.iter().enumerate() {
        let rows = dist.slot_rows(slot);
        if part.len() != rows.len() {
            return Err(Error::bad_input(format!(
                "slot {slot} expected {} rows, got {}",
                rows.len(),
                part.len()
            )));
        }
        for (j, &r) in rows.iter().enumerate() {
            out.set(r, part.get(j));
        }
    }
    Ok(out)
}

/// Splits `elem` into one `Vec<Elem>` per mesh slot, matching [`scatter_indx`].
pub fn scatter_elem(dist: &Distribution, elem: &[Elem]) -> Vec<Vec<Elem>> {
    (0..dist.counts.len())
        .map(|slot| dist.slot_rows(slot).iter().map(|&r| elem[r]).collect())
        .collect()
}

/// Reassembles the per-slot element arrays scattered by [`scatter_elem`]
/// back into their original row order.
pub fn gather_elem(dist: &Distribution, parts: &[Vec<Elem>]) -> Result<Vec<Elem>> {
    if parts.len() != dist.counts.len() {
        return Err(Error::bad_input("expected one part per mesh slot"));
    }
    let mut out = vec![0 as Elem; dist.total_rows()];
    for (slot, part) in parts.iter().enumerate() {
        let rows = dist.slot_rows(slot);
        if part.len() != rows.len() {
            return Err(Error::bad_input(format!(
                "slot {slot} expected {} rows, got {}",
                rows.len(),
                part.len()
            )));
        }
        for (j, &r) in rows.iter().enumerate() {
            out[r] = part[j];
        }
    }
    Ok(out)
}
