/// Error types for script operations.
///
/// Covers tokenizer failures, address construction from malformed
/// operands, and address string parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Script exceeds the configured maximum size.
    #[error("script too large: {size} bytes exceeds limit of {limit}")]
    ScriptTooLarge { size: usize, limit: usize },

    /// A public key operand is not 33 (compressed) or 65 (uncompressed) bytes.
    #[error("invalid public key length: {0} bytes")]
    InvalidPublicKeyLength(usize),

    /// A hash operand is not a 160-bit digest.
    #[error("invalid hash160 length: expected 20 bytes, got {0}")]
    InvalidHashLength(usize),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address version byte or human-readable part is not recognized.
    #[error("address not supported {0}")]
    UnsupportedAddress(String),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] blockparse_primitives::PrimitivesError),
}
