//! Domain invariants for instruction fusion
//!
//! Checkable properties of a registry and of a finished scan. The engine
//! upholds them by construction; tests assert them.

use super::entities::{FusionGroup, InstPtr, Instruction};
use super::value_objects::{FusionStats, GroupSignature};
use std::collections::HashSet;
use std::sync::Arc;

/// No two registered variants share a signature.
pub fn invariant_unique_signatures<I>(groups: &[FusionGroup<I>]) -> bool {
    let mut seen: HashSet<GroupSignature> = HashSet::new();
    let mut total = 0;

    for group in groups {
        for signature in group.variant_signatures() {
            seen.insert(*signature);
            total += 1;
        }
    }

    seen.len() == total
}

/// A scan that fused nothing returns exactly its input, handle for handle.
pub fn invariant_identity_when_unmatched<I: Instruction>(
    input: &[InstPtr<I>],
    output: &[InstPtr<I>],
) -> bool {
    input.len() == output.len() && input.iter().zip(output).all(|(a, b)| Arc::ptr_eq(a, b))
}

/// Every input instruction is classified exactly once: emitted unchanged
/// or consumed by a transform.
pub fn invariant_conservation(stats: &FusionStats, input_len: usize) -> bool {
    stats.passed_through + stats.fused_inputs == input_len
        && stats.accepted + stats.rejected == stats.matches
}
