/// Address construction and parsing.
///
/// Builds addresses from the three kinds of payload a script can carry:
/// a raw public key, a 160-bit hash (P2PKH or P2SH), or a witness
/// program. Legacy addresses use Base58Check; witness addresses use
/// Bech32 (version 0) or Bech32m (versions 1-16).

use std::fmt;
use std::str::FromStr;

use blockparse_primitives::hash::{hash160, HASH160_SIZE};
use blockparse_primitives::{base58, segwit};

use crate::ScriptError;

/// Network an address is encoded for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Main network (P2PKH '1...', P2SH '3...', witness 'bc1...').
    #[default]
    Mainnet,
    /// Test network (P2PKH 'm...'/'n...', P2SH '2...', witness 'tb1...').
    Testnet,
    /// Local regression-test network; shares testnet Base58 prefixes.
    Regtest,
}

impl Network {
    /// Base58Check version byte for P2PKH addresses.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet | Network::Regtest => 0x6f,
        }
    }

    /// Base58Check version byte for P2SH addresses.
    pub fn p2sh_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet | Network::Regtest => 0xc4,
        }
    }

    /// Human-readable part of witness addresses.
    pub fn bech32_hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet => "tb",
            Network::Regtest => "bcrt",
        }
    }

    /// Lowercase network name, as accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(ScriptError::UnsupportedAddress(format!("unknown network '{}'", other))),
        }
    }
}

/// Discriminates the two address forms built from a 160-bit hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hash160Kind {
    /// Pay to public key hash.
    P2pkh,
    /// Pay to script hash.
    P2sh,
}

/// The encoding an address uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressKind {
    /// Base58Check pay to public key hash.
    P2pkh,
    /// Base58Check pay to script hash.
    P2sh,
    /// Witness program of the given version.
    Witness { version: u8 },
}

/// A spending address derived from a script operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The encoded address string.
    pub address_string: String,
    /// How the address is encoded.
    pub kind: AddressKind,
    /// The committed payload: a 160-bit hash for P2PKH/P2SH, or the
    /// witness program for witness addresses.
    pub hash: Vec<u8>,
    /// The public key the hash was computed from, when known.
    pub public_key: Option<Vec<u8>>,
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Create a P2PKH address from a raw public key.
    ///
    /// # Arguments
    /// * `public_key` - A 33-byte compressed or 65-byte uncompressed key.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// The address of `hash160(public_key)`, or `InvalidPublicKeyLength`.
    pub fn from_public_key(public_key: &[u8], network: Network) -> Result<Self, ScriptError> {
        if public_key.len() != 33 && public_key.len() != 65 {
            return Err(ScriptError::InvalidPublicKeyLength(public_key.len()));
        }
        let h = hash160(public_key);
        let mut address = Self::from_hash160(&h, Hash160Kind::P2pkh, network)?;
        address.public_key = Some(public_key.to_vec());
        Ok(address)
    }

    /// Create a P2PKH or P2SH address from a 160-bit hash.
    ///
    /// # Arguments
    /// * `hash` - Exactly 20 bytes.
    /// * `kind` - Which version byte to use.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// The Base58Check address, or `InvalidHashLength`.
    pub fn from_hash160(hash: &[u8], kind: Hash160Kind, network: Network) -> Result<Self, ScriptError> {
        if hash.len() != HASH160_SIZE {
            return Err(ScriptError::InvalidHashLength(hash.len()));
        }
        let (version, kind) = match kind {
            Hash160Kind::P2pkh => (network.p2pkh_version(), AddressKind::P2pkh),
            Hash160Kind::P2sh => (network.p2sh_version(), AddressKind::P2sh),
        };
        let mut payload = Vec::with_capacity(1 + HASH160_SIZE);
        payload.push(version);
        payload.extend_from_slice(hash);

        Ok(Address {
            address_string: base58::check_encode(&payload),
            kind,
            hash: hash.to_vec(),
            public_key: None,
            network,
        })
    }

    /// Create a witness address from a witness program.
    ///
    /// # Arguments
    /// * `program` - The witness program (20 or 32 bytes for version 0).
    /// * `version` - Witness version, 0-16.
    /// * `network` - Selects the human-readable part.
    pub fn from_witness_program(program: &[u8], version: u8, network: Network) -> Result<Self, ScriptError> {
        let address_string = segwit::encode(network.bech32_hrp(), version, program)?;
        Ok(Address {
            address_string,
            kind: AddressKind::Witness { version },
            hash: program.to_vec(),
            public_key: None,
            network,
        })
    }

    /// Parse an address string.
    ///
    /// Accepts Base58Check P2PKH/P2SH addresses and Bech32/Bech32m witness
    /// addresses, detecting the network from the version byte or
    /// human-readable part. Testnet Base58 prefixes parse as `Testnet`.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        if let Some(network) = witness_network(addr) {
            let (_, version, program) = segwit::decode(addr)?;
            return Self::from_witness_program(&program, version, network);
        }

        let decoded = base58::check_decode(addr)
            .map_err(|e| ScriptError::InvalidAddress(format!("'{}': {}", addr, e)))?;
        if decoded.len() != 1 + HASH160_SIZE {
            return Err(ScriptError::InvalidAddress(format!(
                "'{}': payload is {} bytes",
                addr,
                decoded.len()
            )));
        }
        let (network, kind) = match decoded[0] {
            0x00 => (Network::Mainnet, Hash160Kind::P2pkh),
            0x05 => (Network::Mainnet, Hash160Kind::P2sh),
            0x6f => (Network::Testnet, Hash160Kind::P2pkh),
            0xc4 => (Network::Testnet, Hash160Kind::P2sh),
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };
        Self::from_hash160(&decoded[1..], kind, network)
    }
}

/// Detect a witness address by its human-readable part.
fn witness_network(addr: &str) -> Option<Network> {
    let lower = addr.to_ascii_lowercase();
    // The trailing separator keeps "bc1" from matching "bcrt1".
    [Network::Regtest, Network::Mainnet, Network::Testnet]
        .into_iter()
        .find(|n| lower.starts_with(&format!("{}1", n.bech32_hrp())))
}

impl fmt::Display for Address {
    /// Display the address as its encoded string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.address_string)
    }
}
