use blockparse_script::ScriptError;

/// Error types for input record decoding and address resolution.
///
/// Memoized failures are handed out on every access, so the type is
/// `Clone` and comparable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The buffer is shorter than the record's declared length fields.
    #[error("malformed input record: {0}")]
    MalformedRecord(String),
    /// The redeem script could not be tokenized (forwarded from `blockparse-script`).
    #[error("script decode error: {0}")]
    ScriptDecode(#[from] ScriptError),
    /// A decoder configuration document could not be parsed.
    #[error("invalid decode config: {0}")]
    InvalidConfig(String),
    /// A script operand has the wrong length or shape for its role.
    #[error("address derivation error: {0}")]
    AddressDerivation(String),
}
