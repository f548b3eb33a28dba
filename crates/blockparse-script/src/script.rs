/// Script types - raw script bytes and their tokenized view.
///
/// A `Script` wraps the raw bytes of a redeem or locking script. Parsing
/// it yields a `ParsedScript`: the ordered chunk sequence, a structural
/// validity flag, and the template predicates used to classify the
/// script.

use std::fmt;

use crate::chunk::{push_data_prefix, tokenize, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// Default upper bound on script size accepted by the tokenizer.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tokenize the script with the default size limit.
    pub fn parse(&self) -> Result<ParsedScript, ScriptError> {
        ParsedScript::parse(&self.0)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append data bytes to the script with the minimal PUSHDATA prefix.
    pub fn append_push_data(&mut self, data: &[u8]) -> &mut Self {
        self.0.extend_from_slice(&push_data_prefix(data.len()));
        self.0.extend_from_slice(data);
        self
    }

    /// Append raw opcode bytes to the script.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(opcodes);
        self
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ParsedScript
// ---------------------------------------------------------------------------

/// The tokenized form of a script.
///
/// Holds the chunk sequence and whether the whole script tokenized
/// cleanly. A script with a truncated push is still a `ParsedScript`: its
/// chunks stop at the truncation point and `is_valid()` is `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedScript {
    script: Script,
    chunks: Vec<ScriptChunk>,
    valid: bool,
}

impl ParsedScript {
    /// Tokenize `bytes` with the default [`MAX_SCRIPT_SIZE`] limit.
    pub fn parse(bytes: &[u8]) -> Result<Self, ScriptError> {
        Self::parse_with_limit(bytes, MAX_SCRIPT_SIZE)
    }

    /// Tokenize `bytes`, rejecting scripts longer than `limit`.
    ///
    /// # Returns
    /// The parsed script, or `ScriptTooLarge`. Truncated pushes are not an
    /// error; they clear the validity flag.
    pub fn parse_with_limit(bytes: &[u8], limit: usize) -> Result<Self, ScriptError> {
        if bytes.len() > limit {
            return Err(ScriptError::ScriptTooLarge {
                size: bytes.len(),
                limit,
            });
        }
        let (chunks, valid) = tokenize(bytes);
        Ok(ParsedScript {
            script: Script::from_bytes(bytes),
            chunks,
            valid,
        })
    }

    /// The raw script this view was parsed from.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// The ordered operations of the script.
    pub fn chunks(&self) -> &[ScriptChunk] {
        &self.chunks
    }

    /// Whether every push in the script had its full payload.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Render the operations as space-separated ASM.
    ///
    /// A structurally invalid script ends with an `[error]` token.
    pub fn to_asm(&self) -> String {
        let mut parts: Vec<String> = self.chunks.iter().map(|c| c.to_asm_string()).collect();
        if !self.valid {
            parts.push("[error]".to_string());
        }
        parts.join(" ")
    }

    // -----------------------------------------------------------------------
    // Template predicates
    // -----------------------------------------------------------------------

    /// Pattern: OP_DUP OP_HASH160 <push> OP_EQUALVERIFY OP_CHECKSIG
    ///
    /// The pushed hash is not length-checked here; address derivation
    /// rejects a hash that is not 20 bytes.
    pub fn is_pubkeyhash(&self) -> bool {
        let c = &self.chunks;
        c.len() == 5
            && c[0].op == OP_DUP
            && c[1].op == OP_HASH160
            && c[2].data.is_some()
            && c[3].op == OP_EQUALVERIFY
            && c[4].op == OP_CHECKSIG
    }

    /// Pattern: <pubkey> OP_CHECKSIG
    pub fn is_pubkey(&self) -> bool {
        let c = &self.chunks;
        c.len() == 2
            && c[0].push_data().map_or(false, is_public_key)
            && c[1].op == OP_CHECKSIG
    }

    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL, matched on the exact bytes.
    pub fn is_p2sh(&self) -> bool {
        let b = self.script.to_bytes();
        b.len() == 23
            && b[0] == OP_HASH160
            && b[1] == OP_DATA_20
            && b[22] == OP_EQUAL
    }

    /// Pattern: OP_m <pubkey>... OP_n OP_CHECKMULTISIG
    ///
    /// The first `m` keys must look like public keys and `n` must be at
    /// least `m`. The keys between the first `m` and OP_n are not checked.
    pub fn is_multisig(&self) -> bool {
        let c = &self.chunks;
        if c.len() < 4 || c[c.len() - 1].op != OP_CHECKMULTISIG {
            return false;
        }
        let m = match small_int_value(c[0].op) {
            Some(m) if m >= 1 && m + 1 <= c.len() - 2 => m,
            _ => return false,
        };
        if !c[1..1 + m]
            .iter()
            .all(|k| k.push_data().map_or(false, is_public_key))
        {
            return false;
        }
        matches!(small_int_value(c[c.len() - 2].op), Some(n) if n >= m)
    }

    /// Pattern: OP_RETURN ...
    pub fn is_return(&self) -> bool {
        self.chunks.first().map_or(false, |c| c.op == OP_RETURN)
    }

    /// Pattern: OP_0 <20 bytes>
    pub fn is_p2wpkh(&self) -> bool {
        self.is_witness_v0(20)
    }

    /// Pattern: OP_0 <32 bytes>
    pub fn is_p2wsh(&self) -> bool {
        self.is_witness_v0(32)
    }

    fn is_witness_v0(&self, program_len: usize) -> bool {
        let c = &self.chunks;
        c.len() == 2
            && c[0].op == OP_0
            && c[1].push_data().map_or(false, |p| p.len() == program_len)
    }
}

/// Check whether `data` has the shape of a serialized public key.
///
/// Only the length is checked: 33 bytes (compressed) or 65 bytes
/// (uncompressed). The prefix byte is not inspected.
pub fn is_public_key(data: &[u8]) -> bool {
    data.len() == 33 || data.len() == 65
}
