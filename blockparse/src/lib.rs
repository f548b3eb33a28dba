#![deny(missing_docs)]

//! Transaction-input decoding - complete SDK.
//!
//! Re-exports all blockparse components for convenient single-crate usage.

/// Hashing, compact-size integers, Base58Check and Bech32.
pub use blockparse_primitives as primitives;
/// Script tokenizing, template predicates and addresses.
pub use blockparse_script as script;
/// Input record decoding and address resolution.
pub use blockparse_input as input;

pub use blockparse_input::{DecodeConfig, InputError, InputRecord, ScriptTemplate};
pub use blockparse_script::{Address, Network};
