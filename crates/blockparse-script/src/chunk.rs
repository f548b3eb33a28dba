//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated bytes.
//! This module decodes raw script bytes into structured chunks, either
//! strictly (any truncated push is an error) or leniently (decoding stops at
//! the first truncated push and the script is flagged invalid), and encodes
//! push data with the correct OP_PUSHDATA prefix.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
///
/// Each chunk is either a standalone opcode (like OP_DUP) or a data push
/// that carries the opcode byte and the pushed data bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Return the pushed bytes, or `None` for a plain opcode.
    pub fn push_data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Convert this chunk to its ASM string representation.
    ///
    /// Data push chunks are rendered as hex strings; non-push opcodes use
    /// their canonical OP_xxx name.
    pub fn to_asm_string(&self) -> String {
        match self.data {
            Some(ref data) if self.op > OP_0 && self.op <= OP_PUSHDATA4 => hex::encode(data),
            _ => opcode_to_string(self.op),
        }
    }
}

/// Read a single chunk starting at `pos`, advancing `pos` past it.
///
/// # Returns
/// The parsed chunk, or `DataTooSmall` if a push runs past the end of
/// `bytes`. On error `pos` is left unchanged.
pub fn read_chunk(bytes: &[u8], pos: &mut usize) -> Result<ScriptChunk, ScriptError> {
    let start = *pos;
    let op = *bytes.get(start).ok_or(ScriptError::DataTooSmall)?;

    // (length-field width, data length) for the push forms.
    let (header, length) = match op {
        OP_DATA_1..=OP_DATA_75 => (1, op as usize),
        OP_PUSHDATA1 => {
            let b = bytes.get(start + 1..start + 2).ok_or(ScriptError::DataTooSmall)?;
            (2, b[0] as usize)
        }
        OP_PUSHDATA2 => {
            let b = bytes.get(start + 1..start + 3).ok_or(ScriptError::DataTooSmall)?;
            (3, u16::from_le_bytes([b[0], b[1]]) as usize)
        }
        OP_PUSHDATA4 => {
            let b = bytes.get(start + 1..start + 5).ok_or(ScriptError::DataTooSmall)?;
            (5, u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize)
        }
        _ => {
            *pos = start + 1;
            return Ok(ScriptChunk { op, data: None });
        }
    };

    let data_start = start + header;
    let data_end = data_start
        .checked_add(length)
        .filter(|end| *end <= bytes.len())
        .ok_or(ScriptError::DataTooSmall)?;
    *pos = data_end;
    Ok(ScriptChunk {
        op,
        data: Some(bytes[data_start..data_end].to_vec()),
    })
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles OP_DATA_1..OP_DATA_75 (direct push) and OP_PUSHDATA1/2/4
/// (extended push); every other byte is a standalone opcode.
///
/// # Returns
/// A vector of parsed chunks, or a `ScriptError` if the data is truncated.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        chunks.push(read_chunk(bytes, &mut pos)?);
    }
    Ok(chunks)
}

/// Decode as many chunks as possible.
///
/// # Returns
/// The chunks preceding the first truncated push, and `true` when the
/// whole script decoded cleanly.
pub fn tokenize(bytes: &[u8]) -> (Vec<ScriptChunk>, bool) {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        match read_chunk(bytes, &mut pos) {
            Ok(chunk) => chunks.push(chunk),
            Err(_) => return (chunks, false),
        }
    }
    (chunks, true)
}

/// Compute the OP_PUSHDATA prefix bytes for a data payload of the given length.
///
/// Returns the minimal prefix that should be prepended to the data when
/// encoding a push operation into raw script bytes.
pub fn push_data_prefix(data_len: usize) -> Vec<u8> {
    if data_len <= 75 {
        vec![data_len as u8]
    } else if data_len <= 0xFF {
        vec![OP_PUSHDATA1, data_len as u8]
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        buf
    } else {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        buf
    }
}
