//! Hash function primitives.
//!
//! Provides SHA-256, double SHA-256, RIPEMD-160 and Hash160, the digests
//! needed to checksum Base58 payloads and to reduce public keys to the
//! 160-bit hashes embedded in addresses.

use sha2::{Digest, Sha256};
use ripemd::Ripemd160;

/// Size of a Hash160 / RIPEMD-160 digest in bytes.
pub const HASH160_SIZE: usize = 20;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Used for transaction IDs and Base58Check checksums.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; HASH160_SIZE] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; HASH160_SIZE];
    output.copy_from_slice(&result);
    output
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// This is the digest a P2PKH address commits to for a public key.
///
/// # Arguments
/// * `data` - Byte slice to hash, normally a serialized public key.
///
/// # Returns
/// A 20-byte Hash160 digest.
pub fn hash160(data: &[u8]) -> [u8; HASH160_SIZE] {
    ripemd160(&sha256(data))
}
