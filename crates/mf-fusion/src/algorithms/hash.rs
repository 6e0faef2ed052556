//! Group signatures
//!
//! Jenkins one-at-a-time hash over the little-endian bytes of each
//! identifier. Deterministic across runs and platforms, sensitive to both
//! value and order. Not cryptographic: the registry still checks every new
//! signature against the sequences already registered.

use crate::domain::value_objects::{GroupSignature, HashType, InstUid};

/// Streaming one-at-a-time hasher
#[derive(Clone, Copy, Debug, Default)]
pub struct OneAtATime {
    state: HashType,
}

impl OneAtATime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one byte into the accumulator.
    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        let mut h = self.state;
        h = h.wrapping_add(byte as HashType);
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
        self.state = h;
    }

    /// Fold one identifier, low byte first.
    #[inline]
    pub fn write_uid(&mut self, uid: InstUid) {
        for byte in uid.raw().to_le_bytes() {
            self.write_u8(byte);
        }
    }

    /// Final avalanche.
    pub fn finish(self) -> HashType {
        let mut h = self.state;
        h = h.wrapping_add(h << 3);
        h ^= h >> 11;
        h = h.wrapping_add(h << 15);
        h
    }
}

/// Signature of an identifier sequence.
pub fn jenkins_one_at_a_time(uids: &[InstUid]) -> GroupSignature {
    let mut hasher = OneAtATime::new();
    for uid in uids {
        hasher.write_uid(*uid);
    }
    GroupSignature(hasher.finish())
}
