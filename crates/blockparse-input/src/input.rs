//! A single serialized transaction input.
//!
//! Holds its own copy of the record bytes and computes the redeem script,
//! template and addresses on first access. Witness items are appended
//! while the record is exclusively owned; once shared it is read-only.

use std::fmt;
use std::sync::OnceLock;

use blockparse_primitives::chainhash::Hash;
use blockparse_primitives::util::ByteReader;
use blockparse_script::{Address, ParsedScript};

use crate::resolve::resolve;
use crate::{DecodeConfig, InputError, ScriptTemplate};

/// Offset of the script length field: 32-byte hash plus 4-byte output index.
const SCRIPT_LENGTH_OFFSET: usize = 36;

/// A decoded transaction input record.
///
/// # Wire format
///
/// | Field                | Size             |
/// |----------------------|------------------|
/// | previous output hash | 32 bytes         |
/// | previous output index| 4 bytes (LE)     |
/// | script length        | VarInt           |
/// | redeem script        | variable         |
/// | sequence number      | 4 bytes (LE)     |
///
/// Only the length fields and the sequence number are read by
/// [`InputRecord::decode`]. Everything else is derived from the stored
/// bytes when asked for, at most once.
#[derive(Clone, Debug)]
pub struct InputRecord {
    raw: Vec<u8>,
    script_start: usize,
    script_length: usize,
    sequence_number: u32,
    config: DecodeConfig,
    witnesses: Vec<Vec<u8>>,
    script: OnceLock<Result<ParsedScript, InputError>>,
    template: OnceLock<Result<ScriptTemplate, InputError>>,
    addresses: OnceLock<Result<Vec<Address>, InputError>>,
}

impl InputRecord {
    /// Decode a record with the default configuration (mainnet).
    pub fn decode(raw: &[u8]) -> Result<Self, InputError> {
        Self::decode_with(raw, &DecodeConfig::default())
    }

    /// Decode the record starting at the first byte of `raw`.
    ///
    /// `raw` may extend past the end of the record; only `size()` bytes are
    /// copied.
    ///
    /// # Arguments
    /// * `raw` - Buffer positioned at the start of an encoded input.
    /// * `config` - Network and script limits used by the derived fields.
    ///
    /// # Returns
    /// The record, or `MalformedRecord` if the buffer is shorter than the
    /// record's length fields declare.
    pub fn decode_with(raw: &[u8], config: &DecodeConfig) -> Result<Self, InputError> {
        let mut reader = ByteReader::new(raw);
        reader.skip(SCRIPT_LENGTH_OFFSET).map_err(|e| malformed("reading outpoint", e))?;
        let (script_len, consumed) =
            reader.read_varint().map_err(|e| malformed("reading script length", e))?;

        let script_start = SCRIPT_LENGTH_OFFSET + consumed;
        let script_length = usize::try_from(script_len.value())
            .map_err(|e| malformed("reading script length", e))?;
        reader.skip(script_length).map_err(|e| malformed("reading redeem script", e))?;
        let sequence_number =
            reader.read_u32_le().map_err(|e| malformed("reading sequence number", e))?;
        let size = reader.position();

        log::trace!("decoded input record: size={} script_length={}", size, script_length);

        Ok(InputRecord {
            raw: raw[..size].to_vec(),
            script_start,
            script_length,
            sequence_number,
            config: *config,
            witnesses: Vec::new(),
            script: OnceLock::new(),
            template: OnceLock::new(),
            addresses: OnceLock::new(),
        })
    }

    /// Decode a record from a hex string with the default configuration.
    pub fn decode_hex(hex_str: &str) -> Result<Self, InputError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| InputError::MalformedRecord(format!("invalid hex: {}", e)))?;
        Self::decode(&bytes)
    }

    // -----------------------------------------------------------------------
    // Layout fields
    // -----------------------------------------------------------------------

    /// Total encoded length of the record in bytes.
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// The record's own bytes, exactly `size()` long.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Hash of the transaction whose output this input spends.
    pub fn previous_output_hash(&self) -> Hash {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.raw[..32]);
        Hash::new(bytes)
    }

    /// The input's sequence number.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// The undecoded redeem script bytes.
    pub fn redeem_script_bytes(&self) -> &[u8] {
        &self.raw[self.script_start..self.script_start + self.script_length]
    }

    /// The configuration the record was decoded with.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Derived fields
    // -----------------------------------------------------------------------

    /// The tokenized redeem script.
    ///
    /// # Returns
    /// The parsed script, or `ScriptDecode` if it exceeds the configured
    /// maximum size. The outcome is computed once and returned on every
    /// later call.
    pub fn script(&self) -> Result<&ParsedScript, InputError> {
        self.script
            .get_or_init(|| {
                ParsedScript::parse_with_limit(self.redeem_script_bytes(), self.config.max_script_size)
                    .map_err(InputError::from)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The standard template the redeem script matches.
    pub fn template(&self) -> Result<ScriptTemplate, InputError> {
        self.template
            .get_or_init(|| {
                let template = ScriptTemplate::classify(self.script()?);
                log::debug!("classified input script as {}", template);
                Ok(template)
            })
            .clone()
    }

    /// The addresses this input spends from, in script order.
    ///
    /// # Returns
    /// An empty slice for `invalid`, `unknown` and `OP_RETURN` scripts, or
    /// `AddressDerivation` when an operand has the wrong shape. Script
    /// decode failures are passed through.
    pub fn addresses(&self) -> Result<&[Address], InputError> {
        self.addresses
            .get_or_init(|| {
                let template = self.template()?;
                resolve(template, self.script()?.chunks(), self.config.network)
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    // -----------------------------------------------------------------------
    // Witness data
    // -----------------------------------------------------------------------

    /// Append one witness item. Items must be attached in wire order.
    pub fn attach_witness(&mut self, item: Vec<u8>) {
        self.witnesses.push(item);
    }

    /// Builder form of [`InputRecord::attach_witness`].
    pub fn with_witnesses<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.witnesses.extend(items);
        self
    }

    /// The attached witness items, in attachment order.
    pub fn witnesses(&self) -> &[Vec<u8>] {
        &self.witnesses
    }

    /// Whether any witness data has been attached.
    pub fn is_segwit(&self) -> bool {
        !self.witnesses.is_empty()
    }
}

impl fmt::Display for InputRecord {
    /// Display the previous output hash in chain (byte-reversed) order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.previous_output_hash())
    }
}

fn malformed(context: &str, err: impl fmt::Display) -> InputError {
    let err = InputError::MalformedRecord(format!("{}: {}", context, err));
    log::debug!("{}", err);
    err
}
