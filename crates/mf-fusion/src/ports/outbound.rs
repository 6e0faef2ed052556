//! Outbound Ports (Driven Ports / SPI)
//!
//! The decoder / field-extractor collaborator. The engine itself only
//! resolves configuration entries to identifiers; building instruction
//! handles and reading their fields is for callers, constraints and
//! transforms.

use crate::domain::entities::{InstPtrList, Instruction};
use crate::domain::errors::DecodeError;
use crate::domain::value_objects::{FieldName, InstUid, Opcode};
use std::sync::Arc;

/// Resolves configured opcodes and mnemonics to instruction identifiers.
pub trait InstructionDecoder: Send + Sync {
    /// Identifier of the instruction kind this encoding decodes to.
    fn uid_for_opcode(&self, opcode: Opcode) -> Result<InstUid, DecodeError>;

    /// Identifier of the instruction kind with this mnemonic.
    fn uid_for_mnemonic(&self, mnemonic: &str) -> Result<InstUid, DecodeError> {
        Err(DecodeError::UnknownMnemonic(mnemonic.to_string()))
    }
}

impl<D: InstructionDecoder + ?Sized> InstructionDecoder for &D {
    fn uid_for_opcode(&self, opcode: Opcode) -> Result<InstUid, DecodeError> {
        (**self).uid_for_opcode(opcode)
    }

    fn uid_for_mnemonic(&self, mnemonic: &str) -> Result<InstUid, DecodeError> {
        (**self).uid_for_mnemonic(mnemonic)
    }
}

impl<D: InstructionDecoder + ?Sized> InstructionDecoder for Arc<D> {
    fn uid_for_opcode(&self, opcode: Opcode) -> Result<InstUid, DecodeError> {
        (**self).uid_for_opcode(opcode)
    }

    fn uid_for_mnemonic(&self, mnemonic: &str) -> Result<InstUid, DecodeError> {
        (**self).uid_for_mnemonic(mnemonic)
    }
}

/// Decoder for configurations written only in identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct UidOnlyDecoder;

impl InstructionDecoder for UidOnlyDecoder {
    fn uid_for_opcode(&self, _opcode: Opcode) -> Result<InstUid, DecodeError> {
        Err(DecodeError::Unsupported("opcode"))
    }

    fn uid_for_mnemonic(&self, _mnemonic: &str) -> Result<InstUid, DecodeError> {
        Err(DecodeError::Unsupported("mnemonic"))
    }
}

/// Builds instruction handles from raw encodings.
pub trait InstructionFactory<I: Instruction>: InstructionDecoder {
    /// Decode one encoding. An unrecognized opcode aborts construction of
    /// that handle.
    fn make_inst(&self, opcode: Opcode) -> Result<I, DecodeError>;

    /// Decode a whole stream, stopping at the first failure.
    fn make_stream(&self, opcodes: &[Opcode]) -> Result<InstPtrList<I>, DecodeError> {
        opcodes
            .iter()
            .map(|opcode| self.make_inst(*opcode).map(Arc::new))
            .collect()
    }
}

/// Reads structured fields out of a decoded instruction.
pub trait FieldExtractor<I>: Send + Sync {
    /// `None` if the instruction has no such field.
    fn get_field(&self, inst: &I, field: FieldName) -> Option<u64>;

    /// True if the field exists and equals `expected`.
    fn check_field(&self, inst: &I, field: FieldName, expected: u64) -> bool {
        self.get_field(inst, field) == Some(expected)
    }
}
