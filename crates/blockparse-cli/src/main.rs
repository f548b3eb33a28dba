mod cli_args;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use blockparse_input::{DecodeConfig, InputRecord, ScriptTemplate};
use blockparse_script::Address;
use clap::Parser;
use log::{debug, warn};
use serde::Serialize;

use crate::cli_args::CliArgs;

/// JSON view of one decoded input.
#[derive(Serialize)]
struct InputReport<'a> {
    previous_output_hash: String,
    sequence_number: u32,
    size: usize,
    segwit: bool,
    template: Option<ScriptTemplate>,
    script_hex: String,
    script_asm: Option<String>,
    witnesses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    addresses: Option<&'a [Address]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> InputReport<'a> {
    fn new(input: &'a InputRecord) -> Self {
        let (addresses, error) = match input.addresses() {
            Ok(addresses) => (Some(addresses), None),
            Err(e) => {
                warn!("input {}: {}", input, e);
                (None, Some(e.to_string()))
            }
        };
        InputReport {
            previous_output_hash: input.previous_output_hash().to_string(),
            sequence_number: input.sequence_number(),
            size: input.size(),
            segwit: input.is_segwit(),
            template: input.template().ok(),
            script_hex: hex::encode(input.redeem_script_bytes()),
            script_asm: input.script().ok().map(|s| s.to_asm()),
            witnesses: input.witnesses().iter().map(hex::encode).collect(),
            addresses,
            error,
        }
    }
}

fn read_stdin_records() -> Result<Vec<String>> {
    let mut records = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            records.push(line.to_string());
        }
    }
    Ok(records)
}

/// Decode each hex record, attaching the same witness stack to every one.
fn decode_records(
    records: &[String],
    config: &DecodeConfig,
    witnesses: &[Vec<u8>],
) -> Result<Vec<InputRecord>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record_hex)| {
            let raw = hex::decode(record_hex.trim())
                .with_context(|| format!("record {} is not valid hex", i))?;
            let input = InputRecord::decode_with(&raw, config)
                .with_context(|| format!("decoding record {}", i))?
                .with_witnesses(witnesses.iter().cloned());
            if input.size() < raw.len() {
                warn!("record {}: ignoring {} trailing bytes", i, raw.len() - input.size());
            }
            Ok(input)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let config = args.decode_config()?;
    let witnesses = args.witness_items()?;
    debug!("decode config: {:?}", config);

    let records = if args.records.is_empty() {
        read_stdin_records()?
    } else {
        args.records.clone()
    };

    for input in decode_records(&records, &config, &witnesses)? {
        let report = InputReport::new(&input);
        let json = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{}", json);
    }
    Ok(())
}
