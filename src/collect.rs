/// Per-lane substitution table capture.
///
/// With the lane grouping known, un-permuting a repeated-byte pattern
/// produces a plaintext that feeds the same byte value into all 8 lanes at
/// once, no matter how wrong the intra-lane bit order still is. One query
/// per byte value therefore fills one row of all 8 tables simultaneously:
/// 256 queries capture, for each lane k, the true table composed with that
/// lane's unknown bit permutation.
use crate::cipher::unpermute;
use crate::lanes::{shift_for_rounds, LaneGrouping};
use crate::offset::repeat_byte;
use crate::oracle::CachedOracle;
use crate::AttackError;

/// One captured 256-entry table per output byte lane. Table k equals
/// `S ∘ π_k` for some bit permutation `π_k` of the input byte, constant
/// within a lane but unrelated across lanes.
pub struct LaneTables(pub [[u8; 256]; 8]);

pub fn collect_lane_tables(
    oracle: &mut CachedOracle,
    grouping: &LaneGrouping,
    offset: u64,
    rounds: u32,
) -> Result<LaneTables, AttackError> {
    let mut tables = [[0u8; 256]; 8];
    for value in 0..=255u8 {
        let half = unpermute(repeat_byte(value), &grouping.p_guess) ^ offset;
        let ciphertext = oracle.ciphertext(shift_for_rounds(u128::from(half), rounds))?;
        let observed = (ciphertext >> 64) as u64;
        for (lane, table) in tables.iter_mut().enumerate() {
            table[value as usize] = (observed >> (lane * 8)) as u8;
        }
    }
    Ok(LaneTables(tables))
}
