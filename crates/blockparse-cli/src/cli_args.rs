use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use blockparse_input::DecodeConfig;
use blockparse_script::Network;
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum CliNetwork {
    Mainnet,
    Testnet,
    Regtest,
}

impl From<CliNetwork> for Network {
    fn from(network: CliNetwork) -> Self {
        match network {
            CliNetwork::Mainnet => Network::Mainnet,
            CliNetwork::Testnet => Network::Testnet,
            CliNetwork::Regtest => Network::Regtest,
        }
    }
}

#[derive(Parser, Clone, Debug)]
#[command(name = "decode-input", version, about = "Decode serialized transaction inputs and resolve their addresses", long_about = None)]
pub struct CliArgs {
    /// Hex-encoded input records. One record per line is read from stdin when omitted
    pub records: Vec<String>,
    /// Network used to encode addresses [default: mainnet]
    #[clap(short, long, value_enum)]
    pub network: Option<CliNetwork>,
    /// Reject redeem scripts longer than this many bytes [default: 10000]
    #[clap(long)]
    pub max_script_size: Option<usize>,
    /// JSON decode config, overridden by --network and --max-script-size
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Hex-encoded witness item. Repeat in wire order. The same witness stack is attached to every record decoded in this run
    #[clap(short, long = "witness", value_name = "HEX")]
    pub witnesses: Vec<String>,
    /// Pretty-print the JSON output
    #[clap(long)]
    pub pretty: bool,
}

impl CliArgs {
    pub fn decode_config(&self) -> anyhow::Result<DecodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                DecodeConfig::from_json(&json)?
            }
            None => DecodeConfig::default(),
        };
        if let Some(network) = self.network {
            config.network = network.into();
        }
        if let Some(max_script_size) = self.max_script_size {
            config.max_script_size = max_script_size;
        }
        Ok(config)
    }

    pub fn witness_items(&self) -> anyhow::Result<Vec<Vec<u8>>> {
        self.witnesses
            .iter()
            .enumerate()
            .map(|(i, w)| hex::decode(w).with_context(|| format!("witness {} is not valid hex", i)))
            .collect()
    }
}
