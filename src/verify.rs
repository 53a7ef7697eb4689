use crate::cipher::encrypt;
use crate::disambiguate::RecoveredKey;
use crate::oracle::CachedOracle;
use crate::AttackError;

use rand::Rng;

/// Outcome of cross-checking a recovered key against the oracle. Mismatches
/// are reported rather than treated as fatal; the guess still gets
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Local encryption of the all-zero block matched the oracle's cached
    /// baseline.
    pub baseline_ok: bool,
    /// First random plaintext whose local encryption diverged, if any.
    pub first_mismatch: Option<u128>,
    /// Number of random plaintexts checked.
    pub checked: usize,
}

impl VerifyReport {
    pub fn all_ok(&self) -> bool {
        self.baseline_ok && self.first_mismatch.is_none()
    }
}

const RANDOM_PROBES: usize = 256;

/// Re-encrypts held-out plaintexts under the recovered tables and compares
/// against the oracle. The all-zero probe is a cache hit from lane mapping;
/// the random probes are fresh queries.
pub fn verify(
    oracle: &mut CachedOracle,
    key: &RecoveredKey,
    rounds: u32,
    rng: &mut impl Rng,
) -> Result<VerifyReport, AttackError> {
    let baseline_ok = encrypt(0, &key.p, &key.s, rounds) == oracle.ciphertext(0)?;
    if !baseline_ok {
        println!("recovered tables do not reproduce the baseline ciphertext");
    }

    let mut first_mismatch = None;
    for _ in 0..RANDOM_PROBES {
        let plaintext: u128 = rng.gen();
        if encrypt(plaintext, &key.p, &key.s, rounds) != oracle.ciphertext(plaintext)? {
            println!("recovered tables failed on plaintext {plaintext:032X}");
            first_mismatch = Some(plaintext);
            break;
        }
    }

    Ok(VerifyReport { baseline_ok, first_mismatch, checked: RANDOM_PROBES })
}
