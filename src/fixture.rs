//! Shared ground-truth table generators for tests.

use crate::cipher::{Permutation, Substitution};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub(crate) fn random_permutation(rng: &mut StdRng) -> Permutation {
    let mut p: Permutation = std::array::from_fn(|i| i as u8);
    p.shuffle(rng);
    p
}

pub(crate) fn random_bijective_substitution(rng: &mut StdRng) -> Substitution {
    let mut s: Substitution = std::array::from_fn(|x| x as u8);
    s.shuffle(rng);
    s
}

/// Tables for a 3-round target the offset search is guaranteed to crack.
///
/// Forcing `s[0] = 0` makes the all-zero half a fixed point of the first
/// round's permute-then-substitute, so the repeated-byte scan terminates on
/// its very first candidate and the extra round cancels cleanly. S stays
/// bijective, which keeps every single-bit probe's byte difference non-zero.
pub(crate) fn three_round_fixture(seed: u64) -> (Permutation, Substitution) {
    let mut rng = StdRng::seed_from_u64(seed);
    let p = random_permutation(&mut rng);
    let mut s = random_bijective_substitution(&mut rng);
    let zero_at = s.iter().position(|&v| v == 0).unwrap();
    s.swap(0, zero_at);
    (p, s)
}
