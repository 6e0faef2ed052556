//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{FusionOutcome, InstPtr, InstPtrList, Instruction};
use crate::domain::value_objects::{GroupSignature, InstUid};

/// Primary Fusion API
///
/// Implemented by the engine; simulators drive scans through it.
pub trait FusionApi<I: Instruction>: Send + Sync {
    /// Rewrite an instruction stream.
    ///
    /// Pure with respect to the input: returns a new sequence, matched
    /// windows replaced by their group's transform output and every other
    /// instruction passed through in order.
    fn fuse(&self, stream: &[InstPtr<I>]) -> InstPtrList<I>;

    /// Rewrite a stream and report per-scan counters.
    fn fuse_with_stats(&self, stream: &[InstPtr<I>]) -> FusionOutcome<I>;

    /// Signature assigned to a registered group, if any.
    fn signature_of(&self, group: &str) -> Option<GroupSignature>;

    /// Recompute the signature of an identifier sequence.
    fn compute_signature(&self, uids: &[InstUid]) -> GroupSignature;
}
