/// blockparse - Script tokenizing, template predicates, and address handling.
///
/// Provides the raw `Script` type, opcode definitions, script chunk
/// parsing, the `ParsedScript` view with its template predicates, and
/// address construction from public keys, hashes and witness programs.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::{ParsedScript, Script};
pub use address::{Address, AddressKind, Hash160Kind, Network};
pub use chunk::ScriptChunk;
