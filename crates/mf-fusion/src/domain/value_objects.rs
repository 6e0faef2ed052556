//! Value objects for instruction fusion
//!
//! Identifiers, signatures and the configuration shapes a variant can be
//! written in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Raw width of an instruction identifier
pub type UidType = u32;

/// Raw width of a group signature
pub type HashType = u32;

/// Unique-instruction-kind identifier assigned by the decoder.
///
/// Identical for identical instruction kinds, distinct otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstUid(pub UidType);

impl InstUid {
    pub const fn new(raw: UidType) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> UidType {
        self.0
    }
}

impl fmt::Display for InstUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid:{:#x}", self.0)
    }
}

impl From<UidType> for InstUid {
    fn from(raw: UidType) -> Self {
        Self(raw)
    }
}

/// Raw machine encoding of one instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opcode(pub u32);

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for Opcode {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Order-sensitive hash of a variant's identifier sequence.
///
/// A function of the ordered content only, never of the group name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSignature(pub HashType);

impl GroupSignature {
    pub const fn raw(self) -> HashType {
        self.0
    }
}

impl fmt::Display for GroupSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// One concrete, non-empty instruction sequence of a fusion group
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<InstUid>", into = "Vec<InstUid>")]
pub struct Variant(Vec<InstUid>);

impl Variant {
    /// Returns `None` for an empty sequence.
    pub fn new(uids: Vec<InstUid>) -> Option<Self> {
        if uids.is_empty() {
            None
        } else {
            Some(Self(uids))
        }
    }

    pub fn as_slice(&self) -> &[InstUid] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> InstUid {
        self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstUid> {
        self.0.iter()
    }
}

impl TryFrom<Vec<InstUid>> for Variant {
    type Error = &'static str;

    fn try_from(uids: Vec<InstUid>) -> Result<Self, Self::Error> {
        Variant::new(uids).ok_or("variant must contain at least one instruction")
    }
}

impl From<Variant> for Vec<InstUid> {
    fn from(variant: Variant) -> Self {
        variant.0
    }
}

/// Structured instruction fields a field extractor can report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Rd,
    Rs1,
    Rs2,
    Funct3,
    Funct7,
    /// Sign-extended immediate, as raw two's complement bits
    Imm,
}

/// The shapes a variant may be written in before normalization.
///
/// JSON form: `{"kind": "opcodes", "value": [19, 4243]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VariantSource {
    /// Explicit instruction identifiers
    Uids(Vec<InstUid>),
    /// Raw encodings, resolved through the decoder
    Opcodes(Vec<Opcode>),
    /// Assembled-text or instruction-name list, resolved through the decoder
    Mnemonics(Vec<String>),
    /// A variant file: one opcode or mnemonic per line
    File(PathBuf),
}

impl VariantSource {
    /// Short name of the shape, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            VariantSource::Uids(_) => "uids",
            VariantSource::Opcodes(_) => "opcodes",
            VariantSource::Mnemonics(_) => "mnemonics",
            VariantSource::File(_) => "file",
        }
    }
}

/// Serializable part of a fusion group's configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Stable group name (identity of the group)
    pub name: String,
    /// Variants in declaration order
    pub variants: Vec<VariantSource>,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, source: VariantSource) -> Self {
        self.variants.push(source);
        self
    }
}

/// Counters for one scan. Owned by the caller; the engine keeps no state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionStats {
    /// Syntactic matches handed to a constraint
    pub matches: usize,
    /// Matches the constraint accepted
    pub accepted: usize,
    /// Matches the constraint rejected
    pub rejected: usize,
    /// Input instructions emitted unchanged
    pub passed_through: usize,
    /// Input instructions consumed by a transform
    pub fused_inputs: usize,
    /// Length of the output sequence
    pub emitted: usize,
}

impl FusionStats {
    /// Merge the counters of another scan into this one.
    pub fn absorb(&mut self, other: &FusionStats) {
        self.matches += other.matches;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.passed_through += other.passed_through;
        self.fused_inputs += other.fused_inputs;
        self.emitted += other.emitted;
    }
}
