//! Spending address resolution.
//!
//! Maps a classified script's operations to the addresses it pays to.
//! Each template reads its operands at fixed positions; an operand of the
//! wrong shape fails instead of being skipped.

use blockparse_script::opcodes::small_int_value;
use blockparse_script::{Address, Hash160Kind, Network, ScriptChunk};

use crate::{InputError, ScriptTemplate};

/// Derive the addresses for `template` from its script operations.
///
/// # Arguments
/// * `template` - The classification of the script the operations came from.
/// * `chunks` - The tokenized script.
/// * `network` - Network used to encode the addresses.
///
/// # Returns
/// The addresses in script order. `invalid`, `unknown` and `OP_RETURN`
/// scripts resolve to an empty list. A missing or mis-sized operand is an
/// `AddressDerivation` error.
pub fn resolve(
    template: ScriptTemplate,
    chunks: &[ScriptChunk],
    network: Network,
) -> Result<Vec<Address>, InputError> {
    let result = match template {
        ScriptTemplate::PubKey => {
            from_public_key(chunks, 0, network).map(|a| vec![a])
        }
        ScriptTemplate::PubKeyHash => {
            from_hash160(chunks, 2, Hash160Kind::P2pkh, network).map(|a| vec![a])
        }
        ScriptTemplate::P2sh => {
            from_hash160(chunks, 1, Hash160Kind::P2sh, network).map(|a| vec![a])
        }
        ScriptTemplate::Multisig => resolve_multisig(chunks, network),
        ScriptTemplate::P2wpkh | ScriptTemplate::P2wsh => {
            from_witness_v0(chunks, 1, network).map(|a| vec![a])
        }
        ScriptTemplate::OpReturn | ScriptTemplate::Unknown | ScriptTemplate::Invalid => {
            Ok(Vec::new())
        }
    };

    if let Err(ref e) = result {
        log::debug!("address derivation failed for {} script: {}", template, e);
    }
    result
}

/// One address per key in `OP_m <key 1> ... <key n> OP_n OP_CHECKMULTISIG`.
///
/// The key count is `n`, read from the operation before OP_CHECKMULTISIG.
fn resolve_multisig(chunks: &[ScriptChunk], network: Network) -> Result<Vec<Address>, InputError> {
    let count_op = chunks
        .len()
        .checked_sub(2)
        .and_then(|i| chunks.get(i))
        .ok_or_else(|| InputError::AddressDerivation("multisig script too short".to_string()))?;
    let n = small_int_value(count_op.op).ok_or_else(|| {
        InputError::AddressDerivation(format!("multisig key count opcode 0x{:02x}", count_op.op))
    })?;

    (1..=n).map(|i| from_public_key(chunks, i, network)).collect()
}

fn from_public_key(chunks: &[ScriptChunk], index: usize, network: Network) -> Result<Address, InputError> {
    let key = operand(chunks, index)?;
    Address::from_public_key(key, network).map_err(|e| derivation_error(index, e))
}

fn from_hash160(
    chunks: &[ScriptChunk],
    index: usize,
    kind: Hash160Kind,
    network: Network,
) -> Result<Address, InputError> {
    let hash = operand(chunks, index)?;
    Address::from_hash160(hash, kind, network).map_err(|e| derivation_error(index, e))
}

fn from_witness_v0(chunks: &[ScriptChunk], index: usize, network: Network) -> Result<Address, InputError> {
    let program = operand(chunks, index)?;
    Address::from_witness_program(program, 0, network).map_err(|e| derivation_error(index, e))
}

/// The data pushed by operation `index`.
fn operand(chunks: &[ScriptChunk], index: usize) -> Result<&[u8], InputError> {
    let chunk = chunks
        .get(index)
        .ok_or_else(|| InputError::AddressDerivation(format!("missing operand {}", index)))?;
    chunk.push_data().ok_or_else(|| {
        InputError::AddressDerivation(format!(
            "operand {} is opcode 0x{:02x}, not data",
            index, chunk.op
        ))
    })
}

fn derivation_error(index: usize, err: impl std::fmt::Display) -> InputError {
    InputError::AddressDerivation(format!("operand {}: {}", index, err))
}
