use std::fmt;

/// Fatal conditions that abort a recovery run. No stage retries internally;
/// every error propagates straight out of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackError {
    /// The oracle transport failed or returned something unparsable.
    Oracle(String),
    /// A single-bit probe produced an all-zero ciphertext difference, so the
    /// bit's byte lane could not be identified.
    LaneDiscovery { bit: usize },
    /// No byte value in 0..=255 produced the fixed point needed to cancel
    /// the third round.
    OffsetNotFound,
    /// No candidate substitution table was consistent across all 8 lanes.
    Disambiguation,
}

impl fmt::Display for AttackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackError::Oracle(msg) => write!(f, "oracle call failed: {msg}"),
            AttackError::LaneDiscovery { bit } => {
                write!(f, "no ciphertext byte changed when flipping input bit {bit}")
            }
            AttackError::OffsetNotFound => {
                write!(f, "no repeated-byte pattern survives the first round unchanged")
            }
            AttackError::Disambiguation => {
                write!(f, "no substitution table is consistent across all 8 lanes")
            }
        }
    }
}

impl std::error::Error for AttackError {}

impl From<reqwest::Error> for AttackError {
    fn from(err: reqwest::Error) -> Self {
        AttackError::Oracle(err.to_string())
    }
}
