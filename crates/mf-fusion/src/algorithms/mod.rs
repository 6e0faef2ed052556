//! Algorithms module for instruction fusion
//!
//! Contains:
//! - One-at-a-time signature hash
//! - Sequence index (prefix trie)
//! - Match context state machine
//! - Configuration normalization

pub mod context;
pub mod hash;
pub mod normalize;
pub mod radix_trie;

pub use context::{FusionContext, MatchState, PendingMatch, StepOutcome};
pub use hash::{jenkins_one_at_a_time, OneAtATime};
pub use normalize::{normalize_source, normalize_spec};
pub use radix_trie::{NodeId, RadixTrie, Terminal, TerminalConflict};
