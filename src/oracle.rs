use crate::cipher::{encrypt, Permutation, Substitution};
use crate::AttackError;

use std::collections::HashMap;

/// An encryption oracle for the target cipher under a fixed, unknown key.
/// The remote keymaster and the in-process test oracle both satisfy this.
pub trait CipherOracle {
    fn call(&self, plaintext: u128) -> Result<u128, AttackError>;
}

/// Synthetic oracle over explicit tables. Used to validate the attack
/// locally against known ground truth.
pub struct LocalOracle {
    p: Permutation,
    s: Substitution,
    rounds: u32,
}

impl LocalOracle {
    pub fn new(p: Permutation, s: Substitution, rounds: u32) -> Self {
        Self { p, s, rounds }
    }
}

impl CipherOracle for LocalOracle {
    fn call(&self, plaintext: u128) -> Result<u128, AttackError> {
        Ok(encrypt(plaintext, &self.p, &self.s, self.rounds))
    }
}

/// Memoizing wrapper over an oracle. Every analysis stage goes through one
/// shared instance of this, so plaintexts requested by more than one stage
/// (the all-zero block, for instance) cost a single oracle call. Entries are
/// never evicted; the whole attack issues a few thousand distinct queries.
pub struct CachedOracle<'a> {
    oracle: &'a dyn CipherOracle,
    cache: HashMap<u128, u128>,
    calls: usize,
    trace: bool,
}

impl<'a> CachedOracle<'a> {
    pub fn new(oracle: &'a dyn CipherOracle) -> Self {
        Self {
            oracle,
            cache: HashMap::new(),
            calls: 0,
            trace: false,
        }
    }

    /// Like `new`, but prints every plaintext/ciphertext pair that actually
    /// reaches the oracle.
    pub fn traced(oracle: &'a dyn CipherOracle) -> Self {
        let mut cached = Self::new(oracle);
        cached.trace = true;
        cached
    }

    pub fn ciphertext(&mut self, plaintext: u128) -> Result<u128, AttackError> {
        if let Some(&ciphertext) = self.cache.get(&plaintext) {
            return Ok(ciphertext);
        }
        if self.trace {
            println!("P: {plaintext:032X}");
        }
        let ciphertext = self.oracle.call(plaintext)?;
        if self.trace {
            println!("C: {ciphertext:032X}");
        }
        self.calls += 1;
        self.cache.insert(plaintext, ciphertext);
        Ok(ciphertext)
    }

    /// Number of calls that reached the underlying oracle.
    pub fn oracle_calls(&self) -> usize {
        self.calls
    }

    pub fn distinct_queries(&self) -> usize {
        self.cache.len()
    }
}
