mod cipher;
mod collect;
mod disambiguate;
mod error;
#[cfg(test)]
mod fixture;
mod lanes;
mod offset;
mod oracle;
mod perms;
mod pipeline;
mod remote;
mod server;
mod verify;

pub use cipher::{
    decrypt, encrypt, permute, round, substitute, unpermute, unround, Permutation, Substitution,
};
pub use collect::{collect_lane_tables, LaneTables};
pub use disambiguate::{disambiguate, RecoveredKey};
pub use error::AttackError;
pub use lanes::{map_lanes, LaneGrouping};
pub use offset::{find_offset, repeat_byte};
pub use oracle::{CachedOracle, CipherOracle, LocalOracle};
pub use perms::{apply_to_byte, bit_perm_at, BitPerms, BIT_PERM_COUNT};
pub use pipeline::{break_cipher, Recovery};
pub use remote::RemoteOracle;
pub use server::spawn_keymaster;
pub use verify::{verify, VerifyReport};
