//! Slot hash
//!
//! FNV-1a (32-bit) over the ASCII-lowercased key bytes, folded down to the
//! table's index width.

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;

/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Case-insensitive FNV-1a digest of `key`
pub fn fnv1a_folded(key: &str) -> u32 {
    key.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte.to_ascii_lowercase())).wrapping_mul(FNV_PRIME)
    })
}

/// Home slot of `key` in a table of `2^logsize` slots
///
/// The high bits are XOR-folded into the low bits before masking, so small
/// tables still see the whole digest.
pub fn hash_slot(key: &str, logsize: u32) -> usize {
    let hash = fnv1a_folded(key);
    let mask = 1u32
        .checked_shl(logsize)
        .map_or(u32::MAX, |capacity| capacity.wrapping_sub(1));
    let folded = hash.checked_shr(logsize).unwrap_or(0) ^ hash;
    (folded & mask) as usize
}
