//! Fusion engine
//!
//! Main service implementing FusionApi.
//!
//! Scans an instruction stream left to right against the sequence index.
//! Each attempt is rooted at the scan cursor and runs until the index has
//! no transition, a leaf terminal is reached, or the stream ends. The
//! longest complete variant seen is then resolved through its group's
//! constraint and transform.

use crate::algorithms::context::{FusionContext, PendingMatch, StepOutcome};
use crate::algorithms::hash::jenkins_one_at_a_time;
use crate::algorithms::radix_trie::RadixTrie;
use crate::application::registry::GroupRegistry;
use crate::config::{EndOfStreamPolicy, FusionConfig, RejectPolicy};
use crate::domain::entities::{FusionGroup, FusionGroupCfg, FusionOutcome, InstPtr, InstPtrList, Instruction};
use crate::domain::errors::ConfigError;
use crate::domain::value_objects::{FusionStats, GroupSignature, InstUid};
use crate::ports::inbound::FusionApi;
use crate::ports::outbound::InstructionDecoder;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Fusion engine
///
/// Built once from a registry, then read-only. Any number of scans may
/// share one engine; each scan owns its own match context.
pub struct Fusion<I> {
    config: FusionConfig,
    groups: Vec<FusionGroup<I>>,
    by_name: HashMap<String, usize>,
    trie: RadixTrie,
}

/// How an attempt rooted at the cursor ended
struct Attempt {
    candidate: Option<PendingMatch>,
    exhausted: bool,
}

impl<I: Instruction + 'static> Fusion<I> {
    /// Build an engine from group configurations with default config
    pub fn new<D>(cfgs: Vec<FusionGroupCfg<I>>, decoder: &D) -> Result<Self, ConfigError>
    where
        D: InstructionDecoder + ?Sized,
    {
        Self::with_config(FusionConfig::default(), cfgs, decoder)
    }

    /// Build an engine from group configurations with custom config
    pub fn with_config<D>(
        config: FusionConfig,
        cfgs: Vec<FusionGroupCfg<I>>,
        decoder: &D,
    ) -> Result<Self, ConfigError>
    where
        D: InstructionDecoder + ?Sized,
    {
        let mut registry = GroupRegistry::with_config(config)?;
        registry.build_from_cfg(cfgs, decoder)?;
        Ok(Self::from_registry(registry))
    }

    /// Freeze a populated registry into an engine
    pub fn from_registry(registry: GroupRegistry<I>) -> Self {
        let GroupRegistry {
            config,
            groups,
            by_name,
            trie,
            ..
        } = registry;

        info!(
            groups = groups.len(),
            variants = trie.len(),
            nodes = trie.node_count(),
            max_depth = trie.max_depth(),
            "fusion engine built"
        );

        Self {
            config,
            groups,
            by_name,
            trie,
        }
    }

    /// Rewrite a stream, returning a new sequence. The input is untouched.
    pub fn fuse(&self, stream: &[InstPtr<I>]) -> InstPtrList<I> {
        self.scan(stream).output
    }

    /// Like `fuse`, also reporting what happened to every input instruction.
    pub fn fuse_with_stats(&self, stream: &[InstPtr<I>]) -> FusionOutcome<I> {
        self.scan(stream)
    }

    /// Scan independent streams in parallel
    pub fn fuse_batch(&self, streams: &[InstPtrList<I>]) -> Vec<InstPtrList<I>> {
        streams.par_iter().map(|stream| self.fuse(stream)).collect()
    }

    /// Scan independent streams in parallel, also returning summed stats
    pub fn fuse_batch_with_stats(
        &self,
        streams: &[InstPtrList<I>],
    ) -> (Vec<InstPtrList<I>>, FusionStats) {
        let outcomes: Vec<FusionOutcome<I>> = streams
            .par_iter()
            .map(|stream| self.scan(stream))
            .collect();

        let mut total = FusionStats::default();
        let outputs = outcomes
            .into_iter()
            .map(|outcome| {
                total.absorb(&outcome.stats);
                outcome.output
            })
            .collect();
        (outputs, total)
    }

    /// Signature of a group's primary variant
    pub fn signature_of(&self, name: &str) -> Option<GroupSignature> {
        self.group(name).map(FusionGroup::signature)
    }

    /// Recompute a signature for an arbitrary identifier sequence
    pub fn compute_signature(uids: &[InstUid]) -> GroupSignature {
        jenkins_one_at_a_time(uids)
    }

    pub fn group(&self, name: &str) -> Option<&FusionGroup<I>> {
        self.by_name.get(name).map(|&i| &self.groups[i])
    }

    pub fn groups(&self) -> &[FusionGroup<I>] {
        &self.groups
    }

    pub fn trie(&self) -> &RadixTrie {
        &self.trie
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    fn scan(&self, stream: &[InstPtr<I>]) -> FusionOutcome<I> {
        let mut output = Vec::with_capacity(stream.len());
        let mut stats = FusionStats::default();
        let mut ctx = FusionContext::new(&self.trie);
        let mut pos = 0;

        while pos < stream.len() {
            let attempt = Self::attempt(&mut ctx, stream, pos);

            pos = match attempt.candidate {
                Some(found) => self.resolve(stream, found, &mut output, &mut stats),
                None if attempt.exhausted
                    && self.config.end_of_stream == EndOfStreamPolicy::Flush =>
                {
                    // Unfinished partial match: emit the rest unchanged
                    output.extend_from_slice(&stream[pos..]);
                    stats.passed_through += stream.len() - pos;
                    stream.len()
                }
                None => {
                    output.push(stream[pos].clone());
                    stats.passed_through += 1;
                    pos + 1
                }
            };
        }

        stats.emitted = output.len();
        FusionOutcome { output, stats }
    }

    /// Feed instructions from `start` until the attempt can go no further.
    fn attempt(ctx: &mut FusionContext<'_>, stream: &[InstPtr<I>], start: usize) -> Attempt {
        ctx.begin(start);
        let mut cursor = start;

        loop {
            let Some(inst) = stream.get(cursor) else {
                return Attempt {
                    candidate: ctx.finish(),
                    exhausted: true,
                };
            };

            match ctx.advance(inst.uid()) {
                StepOutcome::Extended | StepOutcome::Terminal => cursor += 1,
                StepOutcome::Complete | StepOutcome::Dead => {
                    return Attempt {
                        candidate: ctx.finish(),
                        exhausted: false,
                    };
                }
            }
        }
    }

    /// Run constraint and transform over a matched window. Returns the
    /// offset where scanning resumes.
    fn resolve(
        &self,
        stream: &[InstPtr<I>],
        found: PendingMatch,
        output: &mut InstPtrList<I>,
        stats: &mut FusionStats,
    ) -> usize {
        let group = &self.groups[found.terminal.group];
        let window = &stream[found.start..found.end];
        stats.matches += 1;

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        if !group.check_constraint(window, &mut accepted, &mut rejected) {
            stats.rejected += 1;
            if self.config.log_matches {
                debug!(
                    group = group.name(),
                    signature = %found.terminal.signature,
                    start = found.start,
                    end = found.end,
                    "match rejected by constraint"
                );
            }

            return match self.config.reject_policy {
                RejectPolicy::NextInstruction => {
                    output.push(window[0].clone());
                    stats.passed_through += 1;
                    found.start + 1
                }
                RejectPolicy::SkipWindow => {
                    output.extend_from_slice(window);
                    stats.passed_through += window.len();
                    found.end
                }
            };
        }

        if accepted.is_empty() && rejected.is_empty() {
            accepted.extend_from_slice(window);
        } else if accepted.len() + rejected.len() != window.len() {
            warn!(
                group = group.name(),
                window = window.len(),
                accepted = accepted.len(),
                rejected = rejected.len(),
                "constraint partition does not cover the matched window"
            );
        }

        let replacement = group.apply_transform(&accepted);

        if self.config.log_matches {
            debug!(
                group = group.name(),
                signature = %found.terminal.signature,
                start = found.start,
                end = found.end,
                replaced_with = replacement.len(),
                "match fused"
            );
        }

        stats.accepted += 1;
        stats.fused_inputs += window.len().saturating_sub(rejected.len());
        stats.passed_through += rejected.len().min(window.len());

        output.extend(replacement);
        output.extend(rejected);
        found.end
    }
}

impl<I> fmt::Debug for Fusion<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fusion")
            .field("config", &self.config)
            .field("groups", &self.groups.len())
            .field("variants", &self.trie.len())
            .finish_non_exhaustive()
    }
}

impl<I: Instruction + 'static> FusionApi<I> for Fusion<I> {
    fn fuse(&self, stream: &[InstPtr<I>]) -> InstPtrList<I> {
        Fusion::fuse(self, stream)
    }

    fn fuse_with_stats(&self, stream: &[InstPtr<I>]) -> FusionOutcome<I> {
        Fusion::fuse_with_stats(self, stream)
    }

    fn signature_of(&self, group: &str) -> Option<GroupSignature> {
        Fusion::signature_of(self, group)
    }

    fn compute_signature(&self, uids: &[InstUid]) -> GroupSignature {
        Fusion::<I>::compute_signature(uids)
    }
}
