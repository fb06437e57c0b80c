//! Permutations and how to apply them to parallel arrays.

use crate::error::{Error, Result};

/// A mapping from output position to input position: `out[i] = in[p[i]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Permutation {
    v: Vec<usize>,
}

impl Permutation {
    /// The identity permutation `p[i] = i`.
    pub fn identity(len: usize) -> Self {
        Permutation {
            v: (0..len).collect(),
        }
    }

    /// Wraps an already-computed mapping directly. Does not validate that
    /// `v` is actually a permutation.
    pub fn from_vec(v: Vec<usize>) -> Self {
        Permutation { v }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.v.len()
    }

    /// Whether the permutation is empty.
    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// The source position mapped to output position `i`.
    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.v[i]
    }

    /// Borrows the underlying mapping.
    pub fn as_slice(&self) -> &[usize] {
        &self.v
    }

    /// Mutably borrows the underlying mapping.
    pub fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.v
    }

    /// Applies the permutation to `src`, returning a freshly allocated
    /// vector with `out[i] = src[p[i]]`.
    pub fn apply<T: Clone>(&self, src: &[T]) -> Vec<T> {
        self.v.iter().map(|&j| src[j].clone()).collect()
    }

    /// Applies the permutation to `src` out-of-place, writing into the
    /// caller-supplied `out` buffer.
    pub fn apply_into<T: Clone>(&self, src: &[T], out: &mut [T]) -> Result<()> {
        if src.len() != self.v.len() || out.len() != self.v.len() {
            return Err(Error::bad_input(
                "permutation length does not match source/destination buffer length",
            ));
        }
        for (i, &j) in self.v.iter().enumerate() {
            out[i] = src[j].clone();
        }
        Ok(())
    }

    /// Applies the permutation to `data` in place, by following the cycles
    /// of the mapping rather than allocating a scratch buffer.
    ///
    /// Grounded in the teacher's own `apply_permutation` helper, generalized
    /// from byte-string sort entries to an arbitrary `Clone` element type.
    pub fn apply_in_place<T: Clone>(&self, data: &mut [T]) -> Result<()> {
        if data.len() != self.v.len() {
            return Err(Error::bad_input(
                "permutation length does not match data buffer length",
            ));
        }
        let mut visited = self.v.clone();
        for i in 0..data.len() {
            let mut current = i;
            while visited[current] != i {
                let next = visited[current];
                data.swap(current, next);
                visited[current] = current;
                current = next;
            }
            visited[current] = current;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_stable() {
        let perm = Permutation::identity(4);
        let src = vec![10, 20, 30, 40];
        assert_eq!(perm.apply(&src), src);
    }

    #[test]
    fn apply_matches_scenario_three() {
        let perm = Permutation::from_vec(vec![2, 1, 0, 3]);
        let elements = vec![0.10, 0.20, 0.30, 0.40];
        assert_eq!(perm.apply(&elements), vec![0.30, 0.20, 0.10, 0.40]);
    }

    #[test]
    fn in_place_matches_out_of_place() {
        let perm = Permutation::from_vec(vec![2, 0, 3, 1]);
        let src = vec!["a", "b", "c", "d"];
        let expected = perm.apply(&src);

        let mut data = src.clone();
        perm.apply_in_place(&mut data).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn apply_into_rejects_length_mismatch() {
        let perm = Permutation::identity(3);
        let src = vec![1, 2, 3];
        let mut out = vec![0; 2];
        assert!(perm.apply_into(&src, &mut out).is_err());
    }
}
