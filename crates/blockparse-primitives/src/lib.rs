/// blockparse - Hashing, encoding and binary-reading primitives.
///
/// This crate provides the foundational building blocks for blockparse:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - Compact-size integer decoding and a cursor-based byte reader
/// - Base58 / Base58Check encoding and decoding
/// - Bech32 / Bech32m segregated-witness address encoding

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod segwit;

mod error;
pub use error::PrimitivesError;
