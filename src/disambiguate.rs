/// Reconciliation of the 8 independently-ambiguous lane tables.
///
/// Each captured lane table is the true substitution table seen through an
/// unknown ordering of the input byte's 8 bits, one of 40,320 per lane. A
/// table can only be the true S if every lane reaches it under some bit
/// ordering, so the search derives all candidate tables per lane, groups
/// identical candidates across lanes and keeps those covered by all 8.
///
/// The per-lane searches share nothing and run in parallel; grouping keeps
/// only the smallest producing rank per (table, lane), which makes the merge
/// insensitive to worker scheduling order.
use crate::cipher::{Permutation, Substitution};
use crate::collect::LaneTables;
use crate::lanes::LaneGrouping;
use crate::perms::{apply_to_byte, bit_perm_at, BitPerms};
use crate::AttackError;

use rayon::prelude::*;

use std::collections::HashMap;

/// A fully-resolved key guess: tables that reproduce the oracle's encryption
/// function. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredKey {
    pub p: Permutation,
    pub s: Substitution,
}

/// All substitution tables consistent with every lane, each paired with the
/// finalized permutation it implies, in deterministic order (ascending
/// lane-0 rank). The target cipher keys its rounds only through (P, S), so
/// every returned candidate encrypts identically; callers typically take the
/// first and report the count rather than hiding the ambiguity.
pub fn disambiguate(
    tables: &LaneTables,
    grouping: &LaneGrouping,
) -> Result<Vec<RecoveredKey>, AttackError> {
    let lane_candidates: Vec<HashMap<Substitution, u32>> = (0..8usize)
        .into_par_iter()
        .map(|lane| derive_lane_candidates(&tables.0[lane]))
        .collect();

    let mut evidence: HashMap<Substitution, [Option<u32>; 8]> = HashMap::new();
    for (lane, candidates) in lane_candidates.into_iter().enumerate() {
        for (table, rank) in candidates {
            let per_lane = evidence.entry(table).or_insert([None; 8]);
            if per_lane[lane].map_or(true, |held| rank < held) {
                per_lane[lane] = Some(rank);
            }
        }
    }

    let mut accepted: Vec<(u32, RecoveredKey)> = evidence
        .into_iter()
        .filter_map(|(s, per_lane)| {
            let mut ranks = [0u32; 8];
            for (lane, rank) in per_lane.iter().enumerate() {
                ranks[lane] = (*rank)?;
            }
            let p = finalize_permutation(grouping, &ranks);
            Some((ranks[0], RecoveredKey { p, s }))
        })
        .collect();
    if accepted.is_empty() {
        return Err(AttackError::Disambiguation);
    }
    // Lane-0 ranks are unique per candidate (one derived table per rank), so
    // this order is total and independent of hash iteration order.
    accepted.sort_by_key(|(lane0_rank, _)| *lane0_rank);
    Ok(accepted.into_iter().map(|(_, key)| key).collect())
}

/// Every table derivable from one lane's capture, keyed to the smallest
/// bit-permutation rank that produces it.
fn derive_lane_candidates(lane_table: &[u8; 256]) -> HashMap<Substitution, u32> {
    let mut candidates = HashMap::new();
    for (rank, perm) in BitPerms::all() {
        let mut derived = [0u8; 256];
        for (x, &out) in lane_table.iter().enumerate() {
            derived[apply_to_byte(x as u8, &perm) as usize] = out;
        }
        candidates.entry(derived).or_insert(rank);
    }
    candidates
}

/// Combines the coarse byte-lane placement from the provisional permutation
/// with the per-lane bit orderings the accepted table implies.
fn finalize_permutation(grouping: &LaneGrouping, ranks: &[u32; 8]) -> Permutation {
    let lane_orders: [[u8; 8]; 8] = std::array::from_fn(|lane| bit_perm_at(ranks[lane]));
    std::array::from_fn(|bit| {
        let provisional = grouping.p_guess[bit];
        let lane = provisional / 8;
        8 * lane + lane_orders[lane as usize][(provisional % 8) as usize]
    })
}
