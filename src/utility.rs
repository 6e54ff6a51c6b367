//! Utility functions useful throughout the codebase.

use sha3::{Digest, Keccak256};

/// Computes the keccak256 hash of `data`.
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Keccak256::digest(data.as_ref()).into()
}

/// Formats `bytes` as a `0x`-prefixed lowercase hex string.
#[must_use]
pub fn to_hex_string(bytes: impl AsRef<[u8]>) -> String {
    let mut value = String::from("0x");
    value.push_str(&hex::encode(bytes));
    value
}

/// Computes the content hash used as the `bytes` of a role: the keccak256 of
/// its id, as a `0x`-prefixed hex string.
#[must_use]
pub fn role_bytes(id: &str) -> String {
    to_hex_string(keccak256(id))
}

/// Computes the ENS namehash of `name`, as a `0x`-prefixed hex string.
///
/// Labels are hashed from right to left onto a zeroed root node, so
/// `namehash("")` is all zeroes.
#[must_use]
pub fn namehash(name: &str) -> String {
    let mut node = [0u8; 32];
    if !name.is_empty() {
        for label in name.rsplit('.') {
            let mut buffer = [0u8; 64];
            buffer[..32].copy_from_slice(&node);
            buffer[32..].copy_from_slice(&keccak256(label));
            node = keccak256(buffer);
        }
    }
    to_hex_string(node)
}
