/// Transaction-input record decoding and spending address resolution.
///
/// Decodes one serialized input record from a caller buffer, classifies its
/// redeem script into a standard template, and derives the addresses the
/// input spends from. Script, template and addresses are computed lazily and
/// memoized; witness items are attached while the record is exclusively
/// owned.

pub mod config;
pub mod input;
pub mod resolve;
pub mod template;

mod error;
pub use config::DecodeConfig;
pub use error::InputError;
pub use input::InputRecord;
pub use template::ScriptTemplate;

#[cfg(test)]
mod tests;
