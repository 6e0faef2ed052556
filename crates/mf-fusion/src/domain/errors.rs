//! Error types for instruction fusion
//!
//! Every error here is raised while loading configuration. Scanning a
//! stream never fails: a non-match or a rejected constraint is a normal
//! outcome.

use super::value_objects::{GroupSignature, InstUid, Opcode};
use thiserror::Error;

/// Load-time configuration errors. Fatal; reported before any scan.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A group was declared without variants
    #[error("Fusion group '{name}' has no variants")]
    EmptyGroup { name: String },

    /// One variant of a group resolved to an empty sequence
    #[error("Variant {index} of fusion group '{group}' is empty")]
    EmptyVariant { group: String, index: usize },

    /// Two groups share a name
    #[error("Fusion group '{name}' is already registered")]
    DuplicateGroup { name: String },

    /// The same sequence is registered twice
    #[error("Variant {sequence:?} of '{group}' duplicates a variant of '{existing}'")]
    DuplicateVariant {
        group: String,
        existing: String,
        sequence: Vec<InstUid>,
    },

    /// Two different sequences hash to the same signature
    #[error("Signature {signature} of '{group}' collides with a different sequence in '{existing}'")]
    SignatureCollision {
        signature: GroupSignature,
        group: String,
        existing: String,
    },

    /// Variant is wider than the machine can fuse
    #[error("Variant of '{group}' has {len} instructions, max is {max}")]
    VariantTooLong { group: String, len: usize, max: usize },

    /// Engine option out of range
    #[error("Invalid fusion config: {0}")]
    InvalidConfig(String),

    /// The decoder collaborator could not resolve a configured entry
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A variant file or group-spec file is unreadable or malformed
    #[error("Variant source '{path}': {reason}")]
    Source { path: String, reason: String },
}

/// Errors surfaced by the decoder / field-extractor collaborator
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown opcode: {0}")]
    UnknownOpcode(Opcode),

    #[error("Unknown mnemonic: {0}")]
    UnknownMnemonic(String),

    #[error("Decoder does not support {0} lookups")]
    Unsupported(&'static str),
}
