//! Standard script template classification.

use std::fmt;
use std::str::FromStr;

use blockparse_script::ParsedScript;

/// The standard form a redeem script matches.
///
/// Variants are listed in classification priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptTemplate {
    /// The script is structurally malformed (a push runs past the end).
    Invalid,
    /// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`
    PubKeyHash,
    /// `<pubkey> OP_CHECKSIG`
    PubKey,
    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    P2sh,
    /// `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`
    Multisig,
    /// `OP_RETURN ...`
    OpReturn,
    /// `OP_0 <20 bytes>`
    P2wpkh,
    /// `OP_0 <32 bytes>`
    P2wsh,
    /// None of the above.
    Unknown,
}

impl ScriptTemplate {
    /// Classify a parsed script. The first matching template wins.
    pub fn classify(script: &ParsedScript) -> Self {
        if !script.is_valid() {
            ScriptTemplate::Invalid
        } else if script.is_pubkeyhash() {
            ScriptTemplate::PubKeyHash
        } else if script.is_pubkey() {
            ScriptTemplate::PubKey
        } else if script.is_p2sh() {
            ScriptTemplate::P2sh
        } else if script.is_multisig() {
            ScriptTemplate::Multisig
        } else if script.is_return() {
            ScriptTemplate::OpReturn
        } else if script.is_p2wpkh() {
            ScriptTemplate::P2wpkh
        } else if script.is_p2wsh() {
            ScriptTemplate::P2wsh
        } else {
            ScriptTemplate::Unknown
        }
    }

    /// The conventional tag name of this template.
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptTemplate::Invalid => "invalid",
            ScriptTemplate::PubKeyHash => "pubkeyhash",
            ScriptTemplate::PubKey => "pubkey",
            ScriptTemplate::P2sh => "p2sh",
            ScriptTemplate::Multisig => "multisig",
            ScriptTemplate::OpReturn => "OP_RETURN",
            ScriptTemplate::P2wpkh => "p2wpkh",
            ScriptTemplate::P2wsh => "p2wsh",
            ScriptTemplate::Unknown => "unknown",
        }
    }

    /// Whether inputs of this template can resolve to addresses.
    pub fn has_addresses(self) -> bool {
        !matches!(
            self,
            ScriptTemplate::Invalid | ScriptTemplate::OpReturn | ScriptTemplate::Unknown
        )
    }
}

impl fmt::Display for ScriptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "invalid" => ScriptTemplate::Invalid,
            "pubkeyhash" => ScriptTemplate::PubKeyHash,
            "pubkey" => ScriptTemplate::PubKey,
            "p2sh" => ScriptTemplate::P2sh,
            "multisig" => ScriptTemplate::Multisig,
            "OP_RETURN" => ScriptTemplate::OpReturn,
            "p2wpkh" => ScriptTemplate::P2wpkh,
            "p2wsh" => ScriptTemplate::P2wsh,
            "unknown" => ScriptTemplate::Unknown,
            other => return Err(format!("unknown script template '{}'", other)),
        })
    }
}

impl serde::Serialize for ScriptTemplate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
