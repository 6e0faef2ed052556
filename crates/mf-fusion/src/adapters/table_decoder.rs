//! Table-backed decoder
//!
//! Resolves encodings with mask/match pairs, the way ISA description files
//! list them, and mnemonics through a name table. Enough for hosts whose
//! decoder already produced such a table, and for tests.

use crate::domain::errors::DecodeError;
use crate::domain::value_objects::{InstUid, Opcode};
use crate::ports::outbound::InstructionDecoder;
use std::collections::HashMap;

/// One instruction kind: `opcode & mask == value` selects it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeEntry {
    pub mnemonic: String,
    pub uid: InstUid,
    pub mask: u32,
    pub value: u32,
}

impl DecodeEntry {
    pub fn matches(&self, opcode: Opcode) -> bool {
        opcode.0 & self.mask == self.value
    }
}

/// Decoder over a list of mask/match entries
#[derive(Clone, Debug, Default)]
pub struct TableDecoder {
    entries: Vec<DecodeEntry>,
    by_mnemonic: HashMap<String, InstUid>,
}

impl TableDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instruction kind. Entries are tried in insertion order, so
    /// list the more specific masks first.
    pub fn with_entry(mut self, mnemonic: &str, uid: InstUid, mask: u32, value: u32) -> Self {
        let mnemonic = mnemonic.to_ascii_lowercase();
        self.by_mnemonic.entry(mnemonic.clone()).or_insert(uid);
        self.entries.push(DecodeEntry {
            mnemonic,
            uid,
            mask,
            value,
        });
        self
    }

    /// The entry an encoding decodes to.
    pub fn entry_for(&self, opcode: Opcode) -> Option<&DecodeEntry> {
        self.entries.iter().find(|e| e.matches(opcode))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl InstructionDecoder for TableDecoder {
    fn uid_for_opcode(&self, opcode: Opcode) -> Result<InstUid, DecodeError> {
        self.entry_for(opcode)
            .map(|e| e.uid)
            .ok_or(DecodeError::UnknownOpcode(opcode))
    }

    fn uid_for_mnemonic(&self, mnemonic: &str) -> Result<InstUid, DecodeError> {
        self.by_mnemonic
            .get(&mnemonic.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| DecodeError::UnknownMnemonic(mnemonic.to_string()))
    }
}
