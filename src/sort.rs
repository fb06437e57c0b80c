//! Parallel LSD radix sort over one or more packed dimensions.
//!
//! The sort walks the bit fields of the requested dimensions from least to
//! most significant (so the first-named dimension ends up dominating the
//! final order), processing up to `radix_bits` bits per pass. Each pass is
//! a classic three-phase counting sort: a parallel histogram, a serial
//! exclusive prefix sum over all threads' bins, and a parallel scatter into
//! a twin buffer. `rayon::scope` provides the barrier between phases, the
//! same role the original's `#pragma omp barrier` played.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use sync_cell_slice::SyncSlice;

use crate::desc::Descriptor;
use crate::error::{Error, Result};
use crate::packed::PackedIndex;
use crate::perm::Permutation;
use crate::{Word, WORD_BITS};

/// Bits processed per radix pass unless overridden.
pub const DEFAULT_RADIX_BITS: u32 = 8;

/// Below this many rows the sort runs single-threaded regardless of the
/// configured (or default) thread count.
pub const PARALLEL_THRESHOLD: usize = 100_000;

static RADIX_BITS_OVERRIDE: AtomicU32 = AtomicU32::new(0);
static NUM_THREADS_OVERRIDE: AtomicUsize = AtomicUsize::new(0);

/// Sets the process-wide default radix width, used by any [`SortOptions`]
/// that leaves `radix_bits` unset. `None` restores the built-in default.
pub fn set_default_radix_bits(bits: Option<u32>) {
    RADIX_BITS_OVERRIDE.store(bits.unwrap_or(0), Ordering::Relaxed);
}

/// Sets the process-wide default thread count, used by any [`SortOptions`]
/// that leaves `num_threads` unset. `None` restores rayon's own heuristic.
pub fn set_default_num_threads(threads: Option<usize>) {
    NUM_THREADS_OVERRIDE.store(threads.unwrap_or(0), Ordering::Relaxed);
}

/// Per-call sort configuration. Unset fields fall back to the process-wide
/// defaults ([`set_default_radix_bits`], [`set_default_num_threads`]),
/// resolved once when the sort call begins.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    /// Bits processed per radix pass, in `1..=word_width`. `None` uses the
    /// process-wide default (itself defaulting to [`DEFAULT_RADIX_BITS`]).
    pub radix_bits: Option<u32>,
    /// Worker thread count. `None` uses the process-wide default (itself
    /// defaulting to rayon's own heuristic).
    pub num_threads: Option<usize>,
}

struct ResolvedOptions {
    radix_bits: u32,
    num_threads: usize,
}

impl SortOptions {
    fn resolve(&self, len: usize) -> Result<ResolvedOptions> {
        let radix_bits = self.radix_bits.unwrap_or_else(|| {
            let v = RADIX_BITS_OVERRIDE.load(Ordering::Relaxed);
            if v == 0 {
                DEFAULT_RADIX_BITS
            } else {
                v
            }
        });
        if radix_bits == 0 || radix_bits > WORD_BITS {
            return Err(Error::bad_input(format!(
                "radix_bits {radix_bits} out of range [1, {WORD_BITS}]"
            )));
        }

        let mut num_threads = self.num_threads.unwrap_or_else(|| {
            let v = NUM_THREADS_OVERRIDE.load(Ordering::Relaxed);
            if v == 0 {
                rayon::current_num_threads()
            } else {
                v
            }
        });
        if num_threads == 0 {
            return Err(Error::bad_input("num_threads must be at least 1"));
        }
        if len <= PARALLEL_THRESHOLD {
            num_threads = 1;
        }

        Ok(ResolvedOptions {
            radix_bits,
            num_threads,
        })
    }
}

/// Which of the two caller-supplied buffers holds the sorted result, for
/// the double-buffered calling convention ([`sort_alt`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortLocation {
    /// The result is in the buffer the caller calls "primary" (`indx`).
    Primary,
    /// The result is in the buffer the caller calls "alternate" (`indx_alt`).
    Alternate,
}

/// Sorts `indx` by `dims` (highest sort priority first), optionally
/// tracking the permutation that produced the sorted order.
///
/// Allocates an internal twin buffer; if an odd number of radix passes
/// occurred, the sorted result is copied back into `indx` (and `perm`, if
/// supplied) before returning. Use [`sort_alt`] to avoid that copy.
pub fn sort(
    desc: &Descriptor,
    dims: &[usize],
    indx: &mut PackedIndex,
    mut perm: Option<&mut Permutation>,
    opts: SortOptions,
) -> Result<()> {
    let len = indx.len();
    if let Some(p) = perm.as_deref() {
        if p.len() != len {
            return Err(Error::bad_input(
                "permutation length does not match index array length",
            ));
        }
    }
    validate_dims(desc, dims)?;
    let resolved = opts.resolve(len)?;

    let mut indx_alt = PackedIndex::zeros(len);
    let mut perm_alt = perm.as_deref().map(|p| Permutation::identity(p.len()));

    let swapped = run_passes(
        desc,
        dims,
        &resolved,
        indx,
        &mut indx_alt,
        perm.as_deref_mut(),
        perm_alt.as_mut(),
    )?;

    if swapped {
        indx.as_mut_slice().copy_from_slice(indx_alt.as_slice());
        if let (Some(p), Some(p_alt)) = (perm.as_deref_mut(), perm_alt.as_ref()) {
            p.as_mut_slice().copy_from_slice(p_alt.as_slice());
        }
    }

    Ok(())
}

/// Sorts `indx` by `dims` using caller-supplied twin buffers for the index
/// array and (optionally) the permutation, avoiding the extra copy
/// [`sort`] performs. Returns which buffer ended up holding the result.
pub fn sort_alt(
    desc: &Descriptor,
    dims: &[usize],
    indx: &mut PackedIndex,
    indx_alt: &mut PackedIndex,
    perm: Option<(&mut Permutation, &mut Permutation)>,
    opts: SortOptions,
) -> Result<SortLocation> {
    if indx.len() != indx_alt.len() {
        return Err(Error::bad_input(
            "indx and indx_alt must have the same length",
        ));
    }
    if let Some((p, p_alt)) = perm.as_ref() {
        if p.len() != indx.len() || p_alt.len() != indx.len() {
            return Err(Error::bad_input(
                "perm and perm_alt must match indx's length",
            ));
        }
    }
    validate_dims(desc, dims)?;
    let resolved = opts.resolve(indx.len())?;

    let (perm_src, perm_dst) = match perm {
        Some((p, p_alt)) => (Some(p), Some(p_alt)),
        None => (None, None),
    };

    let swapped = run_passes(desc, dims, &resolved, indx, indx_alt, perm_src, perm_dst)?;

    Ok(if swapped {
        SortLocation::Alternate
    } else {
        SortLocation::Primary
    })
}

fn validate_dims(desc: &Descriptor, dims: &[usize]) -> Result<()> {
    if dims.is_empty() {
        return Err(Error::bad_input("num_dims must be at least 1"));
    }
    for &d in dims {
        if d >= desc.order() {
            return Err(Error::bad_input(format!(
                "dimension {d} out of range for order {}",
                desc.order()
            )));
        }
    }
    Ok(())
}

/// One radix pass's bit window: `[offset, offset + num_bits)`.
#[derive(Debug, Clone, Copy)]
struct PassWindow {
    offset: u32,
    num_bits: u32,
}

/// Splits the composite key (the concatenation of `dims`' bit fields, most
/// significant first) into a sequence of `radix_bits`-wide passes, walked
/// from least to most significant. Grounded in `indx_sort_thread`'s pass
/// bookkeeping in the original `sort.c`.
fn compute_passes(desc: &Descriptor, dims: &[usize], radix_bits: u32) -> Vec<PassWindow> {
    let total_bits: u32 = dims.iter().map(|&d| desc.bit_width(d)).sum();
    let mut passes = Vec::new();
    if total_bits == 0 {
        return passes;
    }

    let mut dim_idx = dims.len() - 1;
    let mut dim_offset = 0u32;
    let mut dim_bits = 0u32;
    let mut offset = 0u32;
    let mut processed_bits = 0u32;
    let mut first = true;

    while processed_bits < total_bits {
        if first || offset == dim_offset + dim_bits {
            let dim = dims[dim_idx];
            dim_offset = desc.bit_offset(dim);
            dim_bits = desc.bit_width(dim);
            offset = dim_offset;
            if dim_idx > 0 {
                dim_idx -= 1;
            }
        }

        let mut num_bits = radix_bits;
        if offset + radix_bits > dim_offset + dim_bits {
            num_bits = dim_offset + dim_bits - offset;
        }

        passes.push(PassWindow { offset, num_bits });
        offset += num_bits;
        processed_bits += num_bits;
        first = false;
    }

    passes
}

#[inline]
fn window_mask(offset: u32, num_bits: u32) -> Word {
    if num_bits == 0 {
        0
    } else if num_bits >= WORD_BITS {
        Word::MAX
    } else {
        (((1 as Word) << num_bits) - 1) << offset
    }
}

/// Contiguous, non-overlapping `[start, end)` ranges covering `0..len`,
/// one per thread; the last range absorbs any remainder. Grounded in
/// `indx_sort`'s `chunk = indx->len / num_threads` thread-slicing.
fn thread_ranges(len: usize, num_threads: usize) -> Vec<(usize, usize)> {
    let chunk = len / num_threads;
    let mut ranges = Vec::with_capacity(num_threads);
    let mut start = 0;
    for t in 0..num_threads {
        let end = if t == num_threads - 1 { len } else { start + chunk };
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Splits `slice` into contiguous, mutable sub-slices matching `ranges`
/// (which must partition `0..slice.len()` in order). Used to hand each
/// thread a disjoint, borrow-checked piece of a buffer it needs to write
/// by absolute position (the permutation identity seed on the first pass).
fn split_by_ranges<'a, T>(mut slice: &'a mut [T], ranges: &[(usize, usize)]) -> Vec<&'a mut [T]> {
    let mut out = Vec::with_capacity(ranges.len());
    for &(start, end) in ranges {
        let (head, tail) = slice.split_at_mut(end - start);
        out.push(head);
        slice = tail;
    }
    out
}

/// Runs every radix pass, swapping `src`/`dst` (and `perm_src`/`perm_dst`,
/// if tracked) after each one. Returns whether the final result ended up
/// in the buffer the caller calls "alternate" (an odd number of passes).
fn run_passes(
    desc: &Descriptor,
    dims: &[usize],
    opts: &ResolvedOptions,
    mut src: &mut PackedIndex,
    mut dst: &mut PackedIndex,
    mut perm_src: Option<&mut Permutation>,
    mut perm_dst: Option<&mut Permutation>,
) -> Result<bool> {
    let len = src.len();
    let passes = compute_passes(desc, dims, opts.radix_bits);

    log::debug!(
        "radix sort: len={len} num_threads={} radix_bits={} passes={}",
        opts.num_threads,
        opts.radix_bits,
        passes.len()
    );

    if passes.is_empty() {
        if let Some(p) = perm_src.as_deref_mut() {
            for (i, slot) in p.as_mut_slice().iter_mut().enumerate() {
                *slot = i;
            }
        }
        return Ok(false);
    }

    let num_bins: usize = 1usize
        .checked_shl(opts.radix_bits)
        .ok_or_else(|| Error::fatal("radix_bits too wide: histogram allocation would overflow"))?;
    let ranges = thread_ranges(len, opts.num_threads);
    let mut bins = vec![0usize; opts.num_threads * num_bins];

    for (pass_idx, window) in passes.iter().enumerate() {
        let first_pass = pass_idx == 0;
        let mask = window_mask(window.offset, window.num_bits);
        let offset = window.offset;

        log::debug!(
            "radix sort pass {pass_idx}: offset={offset} num_bits={}",
            window.num_bits
        );

        // Phase 1: histogram (plus permutation-identity seeding on the
        // first pass). Each thread owns a disjoint `num_bins`-wide band of
        // `bins` and, on the first pass, a disjoint absolute-position
        // range of `perm_src` -- both checked by the borrow checker, no
        // `unsafe` needed here.
        {
            let bins_chunks: Vec<&mut [usize]> = bins.chunks_mut(num_bins).collect();
            let src_ref: &PackedIndex = src;
            let mut perm_id_slices: Vec<Option<&mut [usize]>> = if first_pass {
                match perm_src.as_deref_mut() {
                    Some(p) => split_by_ranges(p.as_mut_slice(), &ranges)
                        .into_iter()
                        .map(Some)
                        .collect(),
                    None => ranges.iter().map(|_| None).collect(),
                }
            } else {
                ranges.iter().map(|_| None).collect()
            };

            rayon::scope(|s| {
                for ((bins_chunk, perm_slice), &(start, end)) in bins_chunks
                    .into_iter()
                    .zip(perm_id_slices.drain(..))
                    .zip(ranges.iter())
                {
                    s.spawn(move |_| {
                        if let Some(perm_slice) = perm_slice {
                            for (k, i) in (start..end).enumerate() {
                                perm_slice[k] = i;
                            }
                        }
                        for i in start..end {
                            let val = ((src_ref.get(i) & mask) >> offset) as usize;
                            bins_chunk[val] += 1;
                        }
                    });
                }
            });
        }

        // Phase 2: exclusive prefix sum across all threads' bins, done by
        // a single task between the two parallel scopes.
        let mut total = 0usize;
        for b in 0..num_bins {
            for t in 0..opts.num_threads {
                let idx = t * num_bins + b;
                let old = bins[idx];
                bins[idx] = total;
                total += old;
            }
        }

        // Phase 3: scatter. Destination positions are scattered across
        // the whole buffer by the prefix sum above, not contiguous per
        // thread, so `split_at_mut` cannot express the disjointness;
        // `sync-cell-slice` lets each thread write its own positions
        // while the type system still tracks the borrow of the whole
        // buffer for the scope's lifetime.
        {
            let bins_chunks: Vec<&mut [usize]> = bins.chunks_mut(num_bins).collect();
            let src_ref: &PackedIndex = src;
            let perm_src_ref: Option<&Permutation> = perm_src.as_deref();
            let dst_sync = dst.as_mut_slice().as_sync_slice();
            let perm_dst_sync = perm_dst.as_deref_mut().map(|p| p.as_mut_slice().as_sync_slice());

            rayon::scope(|s| {
                for (bins_chunk, &(start, end)) in bins_chunks.into_iter().zip(ranges.iter()) {
                    let dst_sync = &dst_sync;
                    let perm_dst_sync = perm_dst_sync.as_ref();
                    s.spawn(move |_| {
                        for i in start..end {
                            let ele = src_ref.get(i);
                            let val = ((ele & mask) >> offset) as usize;
                            let pos = bins_chunk[val];
                            bins_chunk[val] += 1;
                            // SAFETY: `pos` comes from the prefix sum above and
                            // is unique per (thread, scatter) write -- each
                            // thread's bin counters only ever hand out
                            // positions nobody else's counters can produce.
                            unsafe {
                                dst_sync[pos].set(ele);
                            }
                            if let (Some(perm_src_ref), Some(perm_dst_sync)) =
                                (perm_src_ref, perm_dst_sync)
                            {
                                let carried = perm_src_ref.get(i);
                                // SAFETY: same uniqueness argument as above.
                                unsafe {
                                    perm_dst_sync[pos].set(carried);
                                }
                            }
                        }
                    });
                }
            });
        }

        bins.iter_mut().for_each(|b| *b = 0);
        std::mem::swap(&mut src, &mut dst);
        std::mem::swap(&mut perm_src, &mut perm_dst);
    }

    Ok(passes.len() % 2 == 1)
}
