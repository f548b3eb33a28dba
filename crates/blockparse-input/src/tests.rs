//! Scenario tests for the blockparse-input crate.
//!
//! Covers record layout decoding, template classification through the
//! record, address resolution per template, memoized failures, witness
//! attachment and concurrent first access.

use std::sync::Arc;
use std::thread;

use blockparse_primitives::util::VarInt;
use blockparse_script::{AddressKind, Network, ScriptError};

use crate::{DecodeConfig, InputError, InputRecord, ScriptTemplate};

// -----------------------------------------------------------------------
// Test vectors
// -----------------------------------------------------------------------

/// A signed P2PKH spend (signature + public key) spending output 3.
const SIGNED_INPUT_HEX: &str = "38c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff";

const PUBKEY_1: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const PUBKEY_2: &str = "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
const PUBKEY_3: &str = "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";
const HASH_1: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";

/// Serialize an input record around `script`.
fn record(script: &[u8], sequence: u32) -> Vec<u8> {
    let mut raw: Vec<u8> = (0u8..32).collect();
    raw.extend_from_slice(&7u32.to_le_bytes());
    raw.extend_from_slice(&VarInt::from(script.len()).to_bytes());
    raw.extend_from_slice(script);
    raw.extend_from_slice(&sequence.to_le_bytes());
    raw
}

fn record_hex(script_hex: &str) -> Vec<u8> {
    record(&hex::decode(script_hex).unwrap(), 0xffff_fffe)
}

fn address_strings(input: &InputRecord) -> Vec<String> {
    input
        .addresses()
        .expect("addresses should resolve")
        .iter()
        .map(|a| a.address_string.clone())
        .collect()
}

// -----------------------------------------------------------------------
// Layout
// -----------------------------------------------------------------------

/// Decode a real signed input and check every layout field.
#[test]
fn test_decode_signed_input() {
    let input = InputRecord::decode_hex(SIGNED_INPUT_HEX).expect("should decode");
    assert_eq!(input.size(), 147);
    assert_eq!(hex::encode(input.raw()), SIGNED_INPUT_HEX);
    assert_eq!(
        input.previous_output_hash().to_string(),
        "e2fa2ae1e9a45b72ff180c2a41a06eea293e1a046426bbc363b0ff141cc6c738"
    );
    assert_eq!(input.to_string(), input.previous_output_hash().to_string());
    assert_eq!(input.sequence_number(), 0xffff_ffff);
    assert_eq!(input.redeem_script_bytes().len(), 0x6a);
}

/// A signature-plus-key scriptSig matches no template.
#[test]
fn test_signed_input_is_unknown() {
    let input = InputRecord::decode_hex(SIGNED_INPUT_HEX).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::Unknown));
    assert_eq!(input.addresses(), Ok(&[][..]));
    assert_eq!(input.script().unwrap().chunks().len(), 2);
}

/// Bytes after the record belong to the caller and are not kept.
#[test]
fn test_decode_ignores_trailing_bytes() {
    let mut raw = hex::decode(SIGNED_INPUT_HEX).unwrap();
    raw.extend_from_slice(&[0x02, 0xdc, 0x05, 0x00]);
    let input = InputRecord::decode(&raw).unwrap();
    assert_eq!(input.size(), 147);
    assert_eq!(input.raw(), &raw[..147]);
}

/// A 3-byte length prefix moves the script start to offset 39.
#[test]
fn test_decode_wide_length_prefix() {
    let script = vec![0x61u8; 300];
    let raw = record(&script, 1);
    let input = InputRecord::decode(&raw).unwrap();
    assert_eq!(input.size(), 36 + 3 + 300 + 4);
    assert_eq!(input.redeem_script_bytes(), &script[..]);
    assert_eq!(input.sequence_number(), 1);
}

#[test]
fn test_decode_empty_script() {
    let input = InputRecord::decode(&record(&[], 0)).unwrap();
    assert_eq!(input.size(), 41);
    assert!(input.redeem_script_bytes().is_empty());
    assert_eq!(input.template(), Ok(ScriptTemplate::Unknown));
}

// -----------------------------------------------------------------------
// Malformed records
// -----------------------------------------------------------------------

/// A buffer cut short of the declared size is rejected at decode time.
#[test]
fn test_decode_truncated_record() {
    let raw = record_hex(&format!("76a914{}88ac", HASH_1));
    let result = InputRecord::decode(&raw[..raw.len() - 1]);
    assert!(matches!(result, Err(InputError::MalformedRecord(_))));
}

#[test]
fn test_decode_missing_length_prefix() {
    assert!(matches!(
        InputRecord::decode(&[0u8; 36]),
        Err(InputError::MalformedRecord(_))
    ));
    assert!(matches!(InputRecord::decode(&[]), Err(InputError::MalformedRecord(_))));
}

/// A 0xfd prefix without its two length bytes.
#[test]
fn test_decode_truncated_length_prefix() {
    let mut raw = vec![0u8; 36];
    raw.extend_from_slice(&[0xfd, 0x01]);
    assert!(matches!(InputRecord::decode(&raw), Err(InputError::MalformedRecord(_))));
}

/// A 9-byte length that cannot fit in memory is malformed, not a panic.
#[test]
fn test_decode_huge_declared_length() {
    let mut raw = vec![0u8; 36];
    raw.push(0xff);
    raw.extend_from_slice(&u64::MAX.to_le_bytes());
    raw.extend_from_slice(&[0u8; 8]);
    assert!(matches!(InputRecord::decode(&raw), Err(InputError::MalformedRecord(_))));
}

#[test]
fn test_decode_hex_rejects_bad_hex() {
    assert!(matches!(
        InputRecord::decode_hex("zz"),
        Err(InputError::MalformedRecord(_))
    ));
}

// -----------------------------------------------------------------------
// Templates and addresses
// -----------------------------------------------------------------------

#[test]
fn test_pubkeyhash_input() {
    let input = InputRecord::decode(&record_hex(&format!("76a914{}88ac", HASH_1))).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::PubKeyHash));
    assert_eq!(address_strings(&input), vec!["1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"]);
    assert_eq!(input.addresses().unwrap()[0].kind, AddressKind::P2pkh);
}

#[test]
fn test_pubkey_input_keeps_public_key() {
    let input = InputRecord::decode(&record_hex(&format!("21{}ac", PUBKEY_1))).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::PubKey));
    let addrs = input.addresses().unwrap();
    assert_eq!(addrs.len(), 1);
    assert_eq!(addrs[0].address_string, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    assert_eq!(addrs[0].public_key.as_deref(), Some(&hex::decode(PUBKEY_1).unwrap()[..]));
}

#[test]
fn test_p2sh_input() {
    let input = InputRecord::decode(&record_hex(&format!("a914{}87", HASH_1))).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::P2sh));
    assert_eq!(address_strings(&input), vec!["3CNHUhP3uyB9EUtRLsmvFUmvGdjGdkTxJw"]);
}

/// A 2-of-3 multisig yields all three keys' addresses in script order.
#[test]
fn test_multisig_input() {
    let script = format!("5221{}21{}21{}53ae", PUBKEY_1, PUBKEY_2, PUBKEY_3);
    let input = InputRecord::decode(&record_hex(&script)).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::Multisig));
    assert_eq!(
        address_strings(&input),
        vec![
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH",
            "1cMh228HTCiwS8ZsaakH8A8wze1JR5ZsP",
            "1CUNEBjYrCn2y1SdiUMohaKUi4wpP326Lb",
        ]
    );
}

/// Keys are matched by length, so an unusual first byte still resolves.
#[test]
fn test_multisig_input_with_unprefixed_keys() {
    let key = "05".repeat(33);
    let script = format!("5121{}21{}52ae", key, key);
    let input = InputRecord::decode(&record_hex(&script)).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::Multisig));
    let addrs = input.addresses().unwrap();
    assert_eq!(addrs.len(), 2);
    assert_eq!(addrs[0], addrs[1]);
}

#[test]
fn test_p2wpkh_input() {
    let input = InputRecord::decode(&record_hex(&format!("0014{}", HASH_1))).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::P2wpkh));
    let addrs = input.addresses().unwrap();
    assert_eq!(addrs.len(), 1);
    assert_eq!(addrs[0].address_string, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    assert_eq!(addrs[0].kind, AddressKind::Witness { version: 0 });
}

#[test]
fn test_p2wsh_input_testnet() {
    let config = DecodeConfig::new(Network::Testnet);
    let raw = record_hex("00201863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262");
    let input = InputRecord::decode_with(&raw, &config).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::P2wsh));
    assert_eq!(
        address_strings(&input),
        vec!["tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7"]
    );
}

#[test]
fn test_op_return_input_has_no_addresses() {
    let input = InputRecord::decode(&record_hex("6a0568656c6c6f")).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::OpReturn));
    assert_eq!(input.addresses(), Ok(&[][..]));
}

/// A truncated push classifies as invalid with no addresses and no error.
#[test]
fn test_invalid_script_input() {
    let input = InputRecord::decode(&record_hex("76a914751e76e8")).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::Invalid));
    assert_eq!(input.addresses(), Ok(&[][..]));
    assert!(!input.script().unwrap().is_valid());
}

// -----------------------------------------------------------------------
// Memoized failures
// -----------------------------------------------------------------------

/// A mis-sized hash fails address derivation but not classification.
#[test]
fn test_address_derivation_error_is_memoized() {
    let input = InputRecord::decode(&record_hex("76a903aabbcc88ac")).unwrap();
    assert_eq!(input.template(), Ok(ScriptTemplate::PubKeyHash));
    let first = input.addresses();
    assert!(matches!(first, Err(InputError::AddressDerivation(_))));
    assert_eq!(input.addresses(), first);
}

/// An oversized script fails every derived field, on every call.
#[test]
fn test_script_decode_error_propagates() {
    let config = DecodeConfig::default().with_max_script_size(4);
    let input = InputRecord::decode_with(&record_hex(&format!("0014{}", HASH_1)), &config).unwrap();

    let expected = InputError::ScriptDecode(ScriptError::ScriptTooLarge { size: 22, limit: 4 });
    assert_eq!(input.script().err(), Some(expected.clone()));
    assert_eq!(input.template(), Err(expected.clone()));
    assert_eq!(input.addresses(), Err(expected.clone()));
    assert_eq!(input.template(), Err(expected));
}

// -----------------------------------------------------------------------
// Witnesses
// -----------------------------------------------------------------------

#[test]
fn test_attach_witness_in_order() {
    let mut input = InputRecord::decode(&record_hex(&format!("0014{}", HASH_1))).unwrap();
    assert!(!input.is_segwit());
    input.attach_witness(vec![0x30, 0x44]);
    input.attach_witness(hex::decode(PUBKEY_1).unwrap());
    assert!(input.is_segwit());
    assert_eq!(input.witnesses().len(), 2);
    assert_eq!(input.witnesses()[0], vec![0x30, 0x44]);
}

/// Witness data does not change the layout or the derived fields.
#[test]
fn test_with_witnesses_keeps_layout() {
    let raw = record_hex(&format!("a914{}87", HASH_1));
    let input = InputRecord::decode(&raw)
        .unwrap()
        .with_witnesses(vec![vec![0u8], vec![1u8, 2]]);
    assert_eq!(input.size(), raw.len());
    assert_eq!(input.witnesses(), &[vec![0u8], vec![1u8, 2]][..]);
    assert_eq!(input.template(), Ok(ScriptTemplate::P2sh));
}

// -----------------------------------------------------------------------
// Sharing
// -----------------------------------------------------------------------

#[test]
fn test_record_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InputRecord>();
}

/// Concurrent first readers observe one memoized result.
#[test]
fn test_concurrent_first_access() {
    let script = format!("5221{}21{}21{}53ae", PUBKEY_1, PUBKEY_2, PUBKEY_3);
    let input = Arc::new(InputRecord::decode(&record_hex(&script)).unwrap());

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let input = Arc::clone(&input);
                s.spawn(move || {
                    let addrs = input.addresses().unwrap();
                    (addrs.as_ptr() as usize, addrs.len())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = results[0];
    assert_eq!(first.1, 3);
    assert!(results.iter().all(|r| *r == first));
}

/// A cloned record carries its memoized fields.
#[test]
fn test_clone_after_access() {
    let input = InputRecord::decode(&record_hex(&format!("76a914{}88ac", HASH_1))).unwrap();
    let _ = input.addresses();
    let copy = input.clone();
    assert_eq!(copy.addresses(), input.addresses());
    assert_eq!(copy.size(), input.size());
}
