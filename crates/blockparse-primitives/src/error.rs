/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, binary reading, and address encodings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid bech32: {0}")]
    InvalidBech32(String),

    #[error("invalid witness version {0}")]
    InvalidWitnessVersion(u8),

    #[error("invalid witness program length {len} for version {version}")]
    InvalidWitnessProgram { version: u8, len: usize },

    #[error("unexpected end of data: need {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
