//! Segregated-witness address encoding.
//!
//! Encodes and decodes witness programs as Bech32 (version 0, BIP-173)
//! or Bech32m (versions 1-16, BIP-350) strings under a network's
//! human-readable part.

use bech32::{u5, FromBase32, ToBase32, Variant};

use crate::PrimitivesError;

/// Highest witness version that can be encoded.
pub const MAX_WITNESS_VERSION: u8 = 16;

/// Check that a witness program has a length permitted for its version.
///
/// Version 0 programs are either a 20-byte key hash or a 32-byte script
/// hash; later versions allow anything from 2 to 40 bytes.
pub fn validate_program(version: u8, program: &[u8]) -> Result<(), PrimitivesError> {
    if version > MAX_WITNESS_VERSION {
        return Err(PrimitivesError::InvalidWitnessVersion(version));
    }
    let len = program.len();
    let ok = if version == 0 {
        len == 20 || len == 32
    } else {
        (2..=40).contains(&len)
    };
    if ok {
        Ok(())
    } else {
        Err(PrimitivesError::InvalidWitnessProgram { version, len })
    }
}

/// Encode a witness program as a segwit address.
///
/// # Arguments
/// * `hrp` - Human-readable part, e.g. `"bc"` or `"tb"`.
/// * `version` - Witness version (0-16).
/// * `program` - The witness program bytes.
///
/// # Returns
/// The lowercase address string, or an error if the program is not
/// valid for the version.
pub fn encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, PrimitivesError> {
    validate_program(version, program)?;
    let mut data = vec![u5::try_from_u8(version).map_err(bech32_err)?];
    data.extend(program.to_base32());
    let variant = if version == 0 { Variant::Bech32 } else { Variant::Bech32m };
    bech32::encode(hrp, data, variant).map_err(bech32_err)
}

/// Decode a segwit address into `(hrp, version, program)`.
///
/// The checksum variant must match the version: Bech32 for version 0 and
/// Bech32m for every later version.
pub fn decode(addr: &str) -> Result<(String, u8, Vec<u8>), PrimitivesError> {
    let (hrp, data, variant) = bech32::decode(addr).map_err(bech32_err)?;
    let (version, payload) = data
        .split_first()
        .ok_or_else(|| PrimitivesError::InvalidBech32("empty data part".to_string()))?;
    let version = version.to_u8();
    let expected = if version == 0 { Variant::Bech32 } else { Variant::Bech32m };
    if variant != expected {
        return Err(PrimitivesError::InvalidBech32(format!(
            "checksum variant does not match witness version {}",
            version
        )));
    }
    let program = Vec::<u8>::from_base32(payload).map_err(bech32_err)?;
    validate_program(version, &program)?;
    Ok((hrp, version, program))
}

fn bech32_err(e: bech32::Error) -> PrimitivesError {
    PrimitivesError::InvalidBech32(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2WPKH_PROGRAM: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";
    const P2WSH_PROGRAM: &str = "1863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262";

    // -----------------------------------------------------------------------
    // encode
    // -----------------------------------------------------------------------

    #[test]
    fn test_encode_p2wpkh_mainnet() {
        let program = hex::decode(P2WPKH_PROGRAM).unwrap();
        assert_eq!(
            encode("bc", 0, &program).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn test_encode_p2wsh_testnet() {
        let program = hex::decode(P2WSH_PROGRAM).unwrap();
        assert_eq!(
            encode("tb", 0, &program).unwrap(),
            "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7"
        );
    }

    /// Version 1 programs use the Bech32m checksum.
    #[test]
    fn test_encode_taproot_uses_bech32m() {
        let program =
            hex::decode("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
        assert_eq!(
            encode("bc", 1, &program).unwrap(),
            "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0"
        );
    }

    #[test]
    fn test_encode_rejects_bad_v0_length() {
        assert_eq!(
            encode("bc", 0, &[0u8; 21]),
            Err(PrimitivesError::InvalidWitnessProgram { version: 0, len: 21 })
        );
    }

    #[test]
    fn test_encode_rejects_bad_version() {
        assert_eq!(
            encode("bc", 17, &[0u8; 20]),
            Err(PrimitivesError::InvalidWitnessVersion(17))
        );
    }

    // -----------------------------------------------------------------------
    // decode
    // -----------------------------------------------------------------------

    #[test]
    fn test_decode_p2wpkh_mainnet() {
        let (hrp, version, program) =
            decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").unwrap();
        assert_eq!(hrp, "bc");
        assert_eq!(version, 0);
        assert_eq!(hex::encode(program), P2WPKH_PROGRAM);
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        assert!(decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5").is_err());
    }

    #[test]
    fn test_encode_decode_regtest() {
        let program = hex::decode(P2WSH_PROGRAM).unwrap();
        let addr = encode("bcrt", 0, &program).unwrap();
        assert!(addr.starts_with("bcrt1q"));
        let (hrp, version, decoded) = decode(&addr).unwrap();
        assert_eq!((hrp.as_str(), version), ("bcrt", 0));
        assert_eq!(decoded, program);
    }
}
