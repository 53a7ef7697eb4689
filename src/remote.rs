/// HTTP client for a remote keymaster.
///
/// The keymaster speaks a plain-text query protocol: `/genkey` mints a key
/// number for a session, `/encrypt` encrypts one hex-framed block under it
/// and `/guess` judges a submitted table pair. All table encodings are
/// fixed-width hex with no delimiters, so the field widths are the framing.
use crate::cipher::{Permutation, Substitution};
use crate::oracle::CipherOracle;
use crate::AttackError;

pub struct RemoteOracle {
    client: reqwest::blocking::Client,
    base_url: String,
    key: u64,
}

impl RemoteOracle {
    /// Establishes a session against the keymaster at `base_url`, targeting
    /// a cipher with the given number of rounds.
    pub fn connect(base_url: &str, team: u32, rounds: u32) -> Result<Self, AttackError> {
        let client = reqwest::blocking::Client::new();
        let body = client
            .get(format!("{base_url}/genkey"))
            .query(&[("team", team), ("rounds", rounds)])
            .send()?
            .text()?;
        let key = parse_key_number(&body)?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            key,
        })
    }

    /// The session's key number. Fixed for the lifetime of the oracle.
    pub fn key_number(&self) -> u64 {
        self.key
    }

    /// Submits recovered tables to the scoring endpoint and returns its
    /// verdict text.
    pub fn submit_guess(&self, p: &Permutation, s: &Substitution) -> Result<String, AttackError> {
        let verdict = self
            .client
            .get(format!("{}/guess", self.base_url))
            .query(&[
                ("key", self.key.to_string()),
                ("p", table_hex(p)),
                ("S", table_hex(s)),
            ])
            .send()?
            .text()?;
        Ok(verdict.trim().to_string())
    }
}

impl CipherOracle for RemoteOracle {
    fn call(&self, plaintext: u128) -> Result<u128, AttackError> {
        let body = self
            .client
            .get(format!("{}/encrypt", self.base_url))
            .query(&[
                ("key", self.key.to_string()),
                ("data", format!("{plaintext:032X}")),
            ])
            .send()?
            .text()?;
        u128::from_str_radix(body.trim(), 16)
            .map_err(|err| AttackError::Oracle(format!("unparsable ciphertext {body:?}: {err}")))
    }
}

/// The key number sits between the first `<b>` marker and the `</b>` that
/// follows it.
fn parse_key_number(body: &str) -> Result<u64, AttackError> {
    let start = body
        .find("<b>")
        .ok_or_else(|| AttackError::Oracle(format!("no <b> marker in {body:?}")))?
        + "<b>".len();
    let rest = &body[start..];
    let end = rest
        .find("</b>")
        .ok_or_else(|| AttackError::Oracle(format!("no </b> marker in {body:?}")))?;
    rest[..end]
        .trim()
        .parse()
        .map_err(|err| AttackError::Oracle(format!("bad key number in {body:?}: {err}")))
}

/// Each entry zero-padded to exactly two hex digits, concatenated without
/// delimiters.
fn table_hex(entries: &[u8]) -> String {
    entries.iter().map(|b| format!("{b:02X}")).collect()
}
