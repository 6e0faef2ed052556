//! # MF-Fusion: Decode-Stage Instruction Fusion
//!
//! Recognizes configured multi-instruction sequences in a decoded
//! instruction stream and rewrites each accepted match into a
//! replacement sequence, typically one fused macro-operation.
//!
//! ## Architecture
//!
//! - **Domain**: Core entities (FusionGroup, FusionGroupCfg, Variant, GroupSignature)
//! - **Algorithms**: One-at-a-time signature hash, sequence trie, match context,
//!   configuration normalization
//! - **Ports**: Inbound (FusionApi) and Outbound (InstructionDecoder, FieldExtractor)
//! - **Adapters**: Table-backed decoder, variant-file and group-spec readers
//! - **Application**: GroupRegistry and the Fusion engine
//!
//! ## Example
//!
//! ```
//! use mf_fusion::{Fusion, FusionGroupCfg, InstUid, Instruction, UidOnlyDecoder};
//! use std::sync::Arc;
//!
//! struct Inst(u32);
//! impl Instruction for Inst {
//!     fn uid(&self) -> Option<InstUid> {
//!         Some(InstUid(self.0))
//!     }
//! }
//!
//! let groups = vec![FusionGroupCfg::<Inst>::new("pair")
//!     .uids(vec![InstUid(1), InstUid(2)])
//!     .transform(|_, _| vec![Arc::new(Inst(99))])];
//! let fusion = Fusion::new(groups, &UidOnlyDecoder).expect("valid groups");
//!
//! let stream: Vec<_> = [1, 2, 3].into_iter().map(|u| Arc::new(Inst(u))).collect();
//! let out: Vec<u32> = fusion.fuse(&stream).iter().map(|i| i.0).collect();
//! assert_eq!(out, vec![99, 3]);
//! ```

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{load_group_specs, TableDecoder};
pub use algorithms::{jenkins_one_at_a_time, FusionContext, RadixTrie};
pub use application::{Fusion, GroupRegistry};
pub use config::{EndOfStreamPolicy, FusionConfig, FusionConfigBuilder, RejectPolicy};
pub use domain::entities::*;
pub use domain::errors::{ConfigError, DecodeError};
pub use domain::value_objects::*;
pub use ports::inbound::FusionApi;
pub use ports::outbound::{FieldExtractor, InstructionDecoder, InstructionFactory, UidOnlyDecoder};
