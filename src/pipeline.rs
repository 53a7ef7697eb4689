/// End-to-end recovery: lane mapping, offset search (3 rounds only), table
/// capture, disambiguation, verification. Every stage shares one caching
/// wrapper, so plaintexts requested twice across stages cost one query.
use crate::collect::collect_lane_tables;
use crate::disambiguate::{disambiguate, RecoveredKey};
use crate::lanes::map_lanes;
use crate::offset::find_offset;
use crate::oracle::{CachedOracle, CipherOracle};
use crate::perms::BIT_PERM_COUNT;
use crate::verify::{verify, VerifyReport};
use crate::AttackError;

use rand::Rng;

#[derive(Debug, Clone)]
pub struct Recovery {
    pub key: RecoveredKey,
    /// Offset XORed into the capture probes; always 0 for 2 rounds.
    pub offset: u64,
    /// How many table pairs survived disambiguation. Anything above 1 means
    /// the oracle cannot distinguish them; they all encrypt identically.
    pub candidates: usize,
    pub report: VerifyReport,
    /// Queries that actually reached the oracle.
    pub oracle_calls: usize,
}

pub fn break_cipher(
    oracle: &dyn CipherOracle,
    rounds: u32,
    rng: &mut impl Rng,
) -> Result<Recovery, AttackError> {
    let mut cached = CachedOracle::new(oracle);

    println!("mapping the 64 input bits to byte lanes ({rounds} rounds)");
    let grouping = map_lanes(&mut cached, rounds)?;

    let offset = if rounds == 3 {
        println!("searching for a repeated-byte fixed point to cancel the extra round");
        find_offset(&mut cached)?
    } else {
        0
    };

    println!("capturing the 8 per-lane substitution tables");
    let tables = collect_lane_tables(&mut cached, &grouping, offset, rounds)?;

    println!("reconciling lanes across {BIT_PERM_COUNT} bit orderings each");
    let accepted = disambiguate(&tables, &grouping)?;
    if accepted.len() > 1 {
        println!(
            "{} equivalent candidates accepted; continuing with the first",
            accepted.len()
        );
    }
    let key = accepted[0].clone();

    let report = verify(&mut cached, &key, rounds, rng)?;
    println!(
        "verification {} after {} oracle calls",
        if report.all_ok() { "passed" } else { "FAILED" },
        cached.oracle_calls()
    );

    Ok(Recovery {
        key,
        offset,
        candidates: accepted.len(),
        report,
        oracle_calls: cached.oracle_calls(),
    })
}
