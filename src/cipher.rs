/// The target cipher, reimplemented from its public description.
///
/// One round splits the 128-bit block into two 64-bit halves, permutes the
/// bit positions of the right half, substitutes each resulting byte through
/// an 8-bit lookup table and XORs the result into the left half. The halves
/// then swap, Feistel style. The key material is the permutation P and the
/// substitution table S; recovering those two tables is enough to reproduce
/// the encryption function.

/// Bit permutation over a 64-bit half: `p[i]` is the destination position of
/// source bit `i`. Must be a bijection over 0..64.
pub type Permutation = [u8; 64];

/// Byte substitution table: `s[x]` is the substituted value of byte `x`.
/// Not required to be bijective.
pub type Substitution = [u8; 256];

const LOW_HALF: u128 = u64::MAX as u128;

pub fn permute(half: u64, p: &Permutation) -> u64 {
    let mut scrambled = 0;
    for (bit, &dest) in p.iter().enumerate() {
        scrambled |= ((half >> bit) & 1) << dest;
    }
    scrambled
}

/// Inverse of `permute`: constructs the unique half that `permute` would map
/// to the given value. Only meaningful when `p` is a valid bijection.
pub fn unpermute(half: u64, p: &Permutation) -> u64 {
    let mut source_of = [0u8; 64];
    for (bit, &dest) in p.iter().enumerate() {
        source_of[dest as usize] = bit as u8;
    }
    let mut scrambled = 0;
    for (dest, &bit) in source_of.iter().enumerate() {
        scrambled |= ((half >> dest) & 1) << bit;
    }
    scrambled
}

pub fn substitute(half: u64, s: &Substitution) -> u64 {
    let mut scrambled = 0;
    for byte in (0..64).step_by(8) {
        scrambled |= u64::from(s[((half >> byte) & 0xff) as usize]) << byte;
    }
    scrambled
}

pub fn round(block: u128, p: &Permutation, s: &Substitution) -> u128 {
    let left = (block >> 64) as u64;
    let right = (block & LOW_HALF) as u64;
    (u128::from(right) << 64) | u128::from(left ^ substitute(permute(right, p), s))
}

/// Inverse of `round`. A Feistel step is invertible for any S, bijective or
/// not: the old right half is carried through in the clear, so the mask can
/// always be recomputed.
pub fn unround(block: u128, p: &Permutation, s: &Substitution) -> u128 {
    let new_left = (block >> 64) as u64;
    let new_right = (block & LOW_HALF) as u64;
    let old_right = new_left;
    let old_left = new_right ^ substitute(permute(old_right, p), s);
    (u128::from(old_left) << 64) | u128::from(old_right)
}

pub fn encrypt(plaintext: u128, p: &Permutation, s: &Substitution, rounds: u32) -> u128 {
    let mut block = plaintext;
    for _ in 0..rounds {
        block = round(block, p, s);
    }
    block
}

pub fn decrypt(ciphertext: u128, p: &Permutation, s: &Substitution, rounds: u32) -> u128 {
    let mut block = ciphertext;
    for _ in 0..rounds {
        block = unround(block, p, s);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fixture::random_permutation;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn random_substitution(rng: &mut StdRng) -> Substitution {
        std::array::from_fn(|_| rng.gen())
    }

    #[test]
    fn permute_moves_each_bit_to_its_destination() {
        let mut p: Permutation = std::array::from_fn(|i| i as u8);
        p.swap(0, 63);
        p.swap(8, 17);

        assert_eq!(permute(1, &p), 1 << 63);
        assert_eq!(permute(1 << 63, &p), 1);
        assert_eq!(permute(1 << 8, &p), 1 << 17);
        assert_eq!(permute(1 << 5, &p), 1 << 5);
    }

    #[test]
    fn unpermute_then_permute_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = random_permutation(&mut rng);

        for _ in 0..64 {
            let half: u64 = rng.gen();
            assert_eq!(permute(unpermute(half, &p), &p), half);
            assert_eq!(unpermute(permute(half, &p), &p), half);
        }
    }

    #[test]
    fn substitute_replaces_each_byte_independently() {
        let mut s: Substitution = std::array::from_fn(|x| x as u8);
        s[0xab] = 0x01;
        s[0x00] = 0xff;

        let out = substitute(0x0000_0000_0000_00ab, &s);

        assert_eq!(out, 0xffff_ffff_ffff_ff01);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    fn decrypt_inverts_encrypt_even_for_non_bijective_s(#[case] rounds: u32) {
        let mut rng = StdRng::seed_from_u64(11);
        let p = random_permutation(&mut rng);
        // A random 256-entry table is almost surely not a bijection; the
        // Feistel structure must not care.
        let s = random_substitution(&mut rng);

        for _ in 0..32 {
            let plaintext: u128 = rng.gen();
            let ciphertext = encrypt(plaintext, &p, &s, rounds);
            assert_eq!(decrypt(ciphertext, &p, &s, rounds), plaintext);
        }
    }

    #[test]
    fn round_trip_holds_for_constant_s() {
        let p: Permutation = std::array::from_fn(|i| i as u8);
        let s: Substitution = [0x42; 256];

        let plaintext = 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210;
        let ciphertext = encrypt(plaintext, &p, &s, 3);

        assert_ne!(ciphertext, plaintext);
        assert_eq!(decrypt(ciphertext, &p, &s, 3), plaintext);
    }

    #[test]
    fn one_round_matches_hand_computed_feistel_step() {
        let p: Permutation = std::array::from_fn(|i| i as u8);
        let s: Substitution = std::array::from_fn(|x| (x as u8).wrapping_add(1));

        let left = 0x1111_1111_1111_1111u64;
        let right = 0x0000_0000_0000_00ffu64;
        let block = (u128::from(left) << 64) | u128::from(right);

        // s maps 0x00 -> 0x01 in the seven high byte lanes and 0xff -> 0x00
        // in the lowest one.
        let expected_mask = 0x0101_0101_0101_0100u64;
        let out = round(block, &p, &s);

        assert_eq!((out >> 64) as u64, right);
        assert_eq!(out as u64, left ^ expected_mask);
    }
}
