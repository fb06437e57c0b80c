//! Proves the sampling API's `R: Rng + ?Sized` bound is genuinely usable
//! by a caller's own RNG type, not just `rand`'s built-in generators.

use cootensor::prelude::*;
use rand::{Rng, RngCore};

/// A tiny deterministic xorshift generator, standing in for a caller's own
/// PRNG (e.g. one seeded from a hardware source `rand` doesn't know about).
struct XorShift64(u64);

impl RngCore for XorShift64 {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

#[test]
fn sample_distinct_accepts_an_external_rng_implementation() {
    let desc = Descriptor::build(&[20, 20]).unwrap();
    let mut rng = XorShift64(0x9e3779b97f4a7c15);

    let indx = cootensor::sample::sample_distinct(&desc, 50, &mut rng).unwrap();
    assert_eq!(indx.len(), 50);

    let mut seen = std::collections::HashSet::new();
    for i in 0..indx.len() {
        assert!(seen.insert(indx.get(i)), "duplicate row sampled");
    }
}

#[test]
fn random_permutation_accepts_an_external_rng_implementation() {
    let mut rng = XorShift64(1);
    let perm = cootensor::sample::random_permutation(30, &mut rng);
    let mut seen = vec![false; 30];
    for i in 0..30 {
        let j = perm.get(i);
        assert!(!seen[j]);
        seen[j] = true;
    }
}

#[test]
fn sample_elements_values_stay_within_unit_interval() {
    let mut rng = XorShift64(7);
    let elems: Vec<Elem> = cootensor::sample::sample_elements(200, &mut rng);
    for &e in &elems {
        assert!((0.0..1.0).contains(&e));
    }
    // also exercise the trait object form directly, to confirm `Rng + ?Sized`
    // really does admit unsized dispatch.
    let boxed: Box<dyn Rng> = Box::new(XorShift64(9));
    let mut boxed = boxed;
    let more = cootensor::sample::sample_elements(10, boxed.as_mut());
    assert_eq!(more.len(), 10);
}
