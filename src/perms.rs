/// Enumeration of the 8! = 40,320 orderings of a byte's bit positions.
///
/// The disambiguation search walks all of them per lane, so the generator is
/// lazy, deterministic (lexicographic) and restartable from any rank via
/// factorial-base unranking. Workers can shard the search by rank range
/// without coordinating.

pub const BIT_PERM_COUNT: u32 = 40_320;

const FACTORIALS: [u32; 8] = [1, 1, 2, 6, 24, 120, 720, 5040];

/// The rank-th bit permutation in lexicographic order, as a Lehmer-code
/// unranking. `bit_perm_at(0)` is the identity.
pub fn bit_perm_at(rank: u32) -> [u8; 8] {
    debug_assert!(rank < BIT_PERM_COUNT);
    let mut pool: Vec<u8> = (0..8).collect();
    let mut perm = [0u8; 8];
    let mut rest = rank;
    for (slot, out) in perm.iter_mut().enumerate() {
        let base = FACTORIALS[7 - slot];
        *out = pool.remove((rest / base) as usize);
        rest %= base;
    }
    perm
}

/// Applies a bit permutation to a byte, with the same convention as
/// `cipher::permute`: bit `i` of the input moves to position `perm[i]`.
pub fn apply_to_byte(byte: u8, perm: &[u8; 8]) -> u8 {
    let mut out = 0;
    for (bit, &dest) in perm.iter().enumerate() {
        out |= ((byte >> bit) & 1) << dest;
    }
    out
}

/// Lazy iterator over a rank range of bit permutations.
pub struct BitPerms {
    next: u32,
    end: u32,
}

impl BitPerms {
    pub fn all() -> Self {
        Self { next: 0, end: BIT_PERM_COUNT }
    }

    /// One shard of the search space: ranks `start..end`, clamped to the
    /// full range.
    pub fn shard(start: u32, end: u32) -> Self {
        Self {
            next: start.min(BIT_PERM_COUNT),
            end: end.min(BIT_PERM_COUNT),
        }
    }
}

impl Iterator for BitPerms {
    type Item = (u32, [u8; 8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = (self.next, bit_perm_at(self.next));
        self.next += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_zero_is_the_identity_and_the_last_rank_is_the_reversal() {
        assert_eq!(bit_perm_at(0), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(bit_perm_at(BIT_PERM_COUNT - 1), [7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn enumeration_is_lexicographic_and_exhaustive() {
        let mut previous: Option<[u8; 8]> = None;
        let mut count = 0u32;
        for (rank, perm) in BitPerms::all() {
            assert_eq!(rank, count);
            if let Some(prev) = previous {
                assert!(prev < perm, "rank {rank} broke lexicographic order");
            }
            previous = Some(perm);
            count += 1;
        }
        assert_eq!(count, BIT_PERM_COUNT);
    }

    #[test]
    fn sharding_partitions_the_full_enumeration() {
        let whole: Vec<_> = BitPerms::all().collect();
        let mut sharded = Vec::new();
        for start in (0..BIT_PERM_COUNT).step_by(7_000) {
            sharded.extend(BitPerms::shard(start, start + 7_000));
        }
        assert_eq!(sharded, whole);
    }

    #[test]
    fn apply_to_byte_matches_the_wide_permute_convention() {
        let reversal = [7, 6, 5, 4, 3, 2, 1, 0];
        assert_eq!(apply_to_byte(0b0000_0001, &reversal), 0b1000_0000);
        assert_eq!(apply_to_byte(0b1100_0101, &reversal), 0b1010_0011);

        let identity = [0, 1, 2, 3, 4, 5, 6, 7];
        for byte in 0..=255u8 {
            assert_eq!(apply_to_byte(byte, &identity), byte);
        }
    }
}
