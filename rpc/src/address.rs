//! Cheap client-side shape checks for Phantasma addresses and keys.
//!
//! These only look at the prefix and length of the text form; they do not
//! decode base58 or verify checksums.

/// Length of a user address in text form.
pub const ADDRESS_LENGTH: usize = 45;

/// Length of a WIF-encoded private key.
pub const WIF_LENGTH: usize = 52;

/// Whether `address` looks like a user address: `P` followed by 44 characters.
pub fn is_valid_address(address: &str) -> bool {
    address.starts_with('P') && address.len() == ADDRESS_LENGTH
}

/// Whether `key` looks like a compressed WIF private key (`L` or `K` prefix).
pub fn is_valid_private_key(key: &str) -> bool {
    (key.starts_with('L') || key.starts_with('K')) && key.len() == WIF_LENGTH
}
