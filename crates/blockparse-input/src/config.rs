//! Decoder configuration.

use blockparse_script::script::MAX_SCRIPT_SIZE;
use blockparse_script::Network;

use crate::InputError;

/// Settings applied when decoding an input record.
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "network": "testnet", "max_script_size": 10000 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Network used to encode derived addresses.
    pub network: Network,
    /// Redeem scripts longer than this fail to tokenize.
    pub max_script_size: usize,
}

impl DecodeConfig {
    /// Default limits for the given network.
    pub fn new(network: Network) -> Self {
        DecodeConfig {
            network,
            ..Self::default()
        }
    }

    /// Override the script size limit.
    pub fn with_max_script_size(mut self, max_script_size: usize) -> Self {
        self.max_script_size = max_script_size;
        self
    }

    /// Parse a configuration from a JSON document.
    ///
    /// # Returns
    /// The configuration, with defaults for missing fields, or
    /// `InvalidConfig` naming the JSON problem.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        serde_json::from_str(json)
            .map_err(|e| InputError::InvalidConfig(e.to_string()))
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            network: Network::Mainnet,
            max_script_size: MAX_SCRIPT_SIZE,
        }
    }
}
