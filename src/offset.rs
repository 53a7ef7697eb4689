/// Fixed-point search for the 3-round attack.
///
/// With three rounds the table-capture probes pass through one extra
/// substitution layer before the observable half. That layer can be
/// cancelled by XORing a fixed offset into every probe, where the offset is
/// a repeated-byte pattern the first round's permute-then-substitute leaves
/// unchanged. This stage finds such a pattern by trying all 256 byte values.
use crate::oracle::CachedOracle;
use crate::AttackError;

/// The byte replicated into all 8 byte positions of a 64-bit half.
pub fn repeat_byte(value: u8) -> u64 {
    u64::from(value) * 0x0101_0101_0101_0101
}

/// Returns the first repeated-byte pattern that comes back unchanged in the
/// low half when encrypted from the high half. Its existence is assumed, not
/// proven; `OffsetNotFound` if the assumption fails for this key.
pub fn find_offset(oracle: &mut CachedOracle) -> Result<u64, AttackError> {
    for value in 0..=255u8 {
        let pattern = repeat_byte(value);
        let ciphertext = oracle.ciphertext(u128::from(pattern) << 64)?;
        if ciphertext as u64 == pattern {
            return Ok(pattern);
        }
    }
    Err(AttackError::OffsetNotFound)
}
