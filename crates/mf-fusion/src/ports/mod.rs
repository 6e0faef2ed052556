//! Ports module for instruction fusion
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::FusionApi;
pub use outbound::{FieldExtractor, InstructionDecoder, InstructionFactory, UidOnlyDecoder};
