//! Per-dimension coordinate-value histograms over a [`PackedIndex`].

use crate::desc::Descriptor;
use crate::packed::PackedIndex;

/// For each dimension `i`, how many rows of an associated [`PackedIndex`]
/// carry each coordinate value on that dimension.
///
/// Borrows its descriptor and index array rather than owning them, mirroring
/// the original's "associated objects should be freed separately" comment
/// with a compile-time-enforced borrow instead.
pub struct Frequency<'a> {
    desc: &'a Descriptor,
    indx: &'a PackedIndex,
    dim_freq: Vec<Vec<usize>>,
}

impl<'a> Frequency<'a> {
    /// Builds a frequency table in a single pass over `indx`.
    ///
    /// Each dimension's histogram is sized to its bit field's capacity
    /// (`1 << bit_width(d)`), not `dim_size(d)`: a coordinate may legally
    /// occupy any value the field can represent (see [`Descriptor::insert`]),
    /// which can exceed the dimension's declared size once `dim_size` is
    /// rounded up to the next power of two.
    pub fn build(desc: &'a Descriptor, indx: &'a PackedIndex) -> Self {
        let mut dim_freq: Vec<Vec<usize>> = (0..desc.order())
            .map(|d| vec![0usize; desc.field_capacity(d)])
            .collect();

        for i in 0..indx.len() {
            for (dim, hist) in dim_freq.iter_mut().enumerate() {
                let v = indx.extract(desc, i, dim) as usize;
                hist[v] += 1;
            }
        }

        Frequency {
            desc,
            indx,
            dim_freq,
        }
    }

    /// The descriptor this table was built against.
    pub fn descriptor(&self) -> &Descriptor {
        self.desc
    }

    /// The index array this table was built from.
    pub fn index(&self) -> &PackedIndex {
        self.indx
    }

    /// Number of rows whose coordinate on dimension `dim` equals `value`.
    pub fn get(&self, dim: usize, value: usize) -> usize {
        self.dim_freq[dim][value]
    }

    /// The full histogram for dimension `dim`, indexed by coordinate value.
    pub fn histogram(&self, dim: usize) -> &[usize] {
        &self.dim_freq[dim]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Word;

    #[test]
    fn counts_sum_to_len_per_dimension() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();
        let freq = Frequency::build(&desc, &indx);

        for dim in 0..desc.order() {
            let total: usize = freq.histogram(dim).iter().sum();
            assert_eq!(total, indx.len());
        }
    }

    #[test]
    fn matches_manual_counts() {
        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();
        let freq = Frequency::build(&desc, &indx);

        assert_eq!(freq.get(0, 4), 2);
        assert_eq!(freq.get(0, 0), 1);
        assert_eq!(freq.get(0, 9), 1);
        assert_eq!(freq.get(1, 1), 2);
        assert_eq!(freq.get(2, 0), 2);
        assert_eq!(freq.get(2, 1), 2);
    }
}
