/// Byte-lane discovery.
///
/// Flipping a single plaintext bit changes exactly one byte of the permuted
/// half before substitution, so after one round exactly one byte lane of the
/// observable ciphertext half differs from the all-zero baseline. Probing
/// each of the 64 bits in turn therefore reveals which byte lane each bit is
/// permuted into. Where the bit lands *within* that lane stays unknown here;
/// the disambiguation stage resolves it.
use crate::cipher::Permutation;
use crate::oracle::CachedOracle;
use crate::AttackError;

/// Lane grouping recovered from the differential probes.
#[derive(Debug)]
pub struct LaneGrouping {
    /// For each output byte lane, the input bits that land in it, in
    /// discovery order.
    pub lanes: [Vec<u8>; 8],
    /// Provisional permutation: correct at lane granularity, arbitrary
    /// intra-lane order.
    pub p_guess: Permutation,
}

impl LaneGrouping {
    pub fn lane_of(&self, bit: usize) -> usize {
        self.p_guess[bit] as usize / 8
    }
}

/// A 3-round cipher swaps which half of the block is observable after a
/// differential probe, so probes target the opposite half.
pub(crate) fn shift_for_rounds(value: u128, rounds: u32) -> u128 {
    if rounds == 3 {
        value << 64
    } else {
        value
    }
}

/// Position of the first non-zero byte, scanning from the least significant
/// byte, or None if the whole value is zero.
pub(crate) fn first_nonzero_byte(delta: u64) -> Option<usize> {
    (0..8).find(|&i| (delta >> (i * 8)) & 0xff != 0)
}

pub fn map_lanes(oracle: &mut CachedOracle, rounds: u32) -> Result<LaneGrouping, AttackError> {
    let baseline = oracle.ciphertext(0)?;
    let mut lanes: [Vec<u8>; 8] = Default::default();

    for bit in 0..64 {
        let probe = oracle.ciphertext(shift_for_rounds(1u128 << bit, rounds))?;
        let delta = ((probe ^ baseline) >> 64) as u64;
        let lane = first_nonzero_byte(delta).ok_or(AttackError::LaneDiscovery { bit })?;
        lanes[lane].push(bit as u8);
    }

    // Flattening the lanes in lane order places the bits of each lane in 8
    // contiguous destination positions; inverting that sequence gives the
    // provisional permutation.
    let mut p_guess: Permutation = [0; 64];
    let mut dest = 0u8;
    for lane in &lanes {
        for &bit in lane {
            p_guess[bit as usize] = dest;
            dest += 1;
        }
    }

    Ok(LaneGrouping { lanes, p_guess })
}
