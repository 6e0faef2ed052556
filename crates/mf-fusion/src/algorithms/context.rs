//! Match context
//!
//! Per-cursor state of one matching attempt against the sequence index.
//! A context borrows the read-only trie; every concurrent scan owns its
//! own context.
//!
//! ```text
//! Idle --begin--> Matching --terminal--> Matched --finish--> Idle
//!                    |                      |
//!                    +------dead/end--------+--> finish --> Idle
//! ```
//!
//! `Matched` keeps extending while a longer variant is still reachable.
//! The longest terminal seen is remembered, so a shorter match is honored
//! when the longer one never completes.

use super::radix_trie::{NodeId, RadixTrie, Terminal};
use crate::domain::value_objects::InstUid;
use tracing::trace;

/// Scanning state of a context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchState {
    /// No attempt in progress
    Idle,
    /// At a non-root node, no complete variant seen yet
    Matching,
    /// A complete variant has been seen; a longer one may still follow
    Matched,
}

/// Result of feeding one identifier to the context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Prefix extended; no variant ends here
    Extended,
    /// Prefix extended to a terminal that longer variants share
    Terminal,
    /// Prefix extended to a terminal nothing extends; resolve now
    Complete,
    /// No edge for this identifier; the attempt is over
    Dead,
}

/// A candidate window `[start, end)` and the variant it matched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMatch {
    pub start: usize,
    pub end: usize,
    pub terminal: Terminal,
}

impl PendingMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Mutable state of one matching attempt
#[derive(Debug)]
pub struct FusionContext<'t> {
    trie: &'t RadixTrie,
    state: MatchState,
    node: NodeId,
    start: usize,
    consumed: usize,
    best: Option<PendingMatch>,
}

impl<'t> FusionContext<'t> {
    pub fn new(trie: &'t RadixTrie) -> Self {
        Self {
            trie,
            state: MatchState::Idle,
            node: NodeId::ROOT,
            start: 0,
            consumed: 0,
            best: None,
        }
    }

    /// Start an attempt rooted at stream offset `start`.
    pub fn begin(&mut self, start: usize) {
        self.state = MatchState::Matching;
        self.node = NodeId::ROOT;
        self.start = start;
        self.consumed = 0;
        self.best = None;
        trace!(start, "match attempt started");
    }

    /// Feed the identifier of the next instruction. An unidentifiable
    /// instruction (`None`) never extends a match.
    pub fn advance(&mut self, uid: Option<InstUid>) -> StepOutcome {
        if self.state == MatchState::Idle {
            return StepOutcome::Dead;
        }

        let Some(next) = uid.and_then(|uid| self.trie.step(self.node, uid)) else {
            trace!(start = self.start, consumed = self.consumed, "no transition");
            return StepOutcome::Dead;
        };

        self.node = next;
        self.consumed += 1;

        let Some(terminal) = self.trie.terminal(next) else {
            return StepOutcome::Extended;
        };

        self.state = MatchState::Matched;
        self.best = Some(PendingMatch {
            start: self.start,
            end: self.start + self.consumed,
            terminal: *terminal,
        });
        trace!(
            start = self.start,
            end = self.start + self.consumed,
            signature = %terminal.signature,
            "terminal reached"
        );

        if self.trie.is_leaf(next) {
            StepOutcome::Complete
        } else {
            StepOutcome::Terminal
        }
    }

    /// End the attempt, returning the longest complete match seen.
    /// The context is `Idle` afterwards.
    pub fn finish(&mut self) -> Option<PendingMatch> {
        let best = self.best.take();
        self.reset();
        best
    }

    /// Abandon the attempt.
    pub fn reset(&mut self) {
        self.state = MatchState::Idle;
        self.node = NodeId::ROOT;
        self.consumed = 0;
        self.best = None;
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Stream offset where the current attempt began
    pub fn start(&self) -> usize {
        self.start
    }

    /// Identifiers consumed by the current attempt
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Current trie position
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Longest complete match seen so far in this attempt
    pub fn best(&self) -> Option<&PendingMatch> {
        self.best.as_ref()
    }
}
