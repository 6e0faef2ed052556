//! Sequence index
//!
//! Prefix tree over instruction identifiers. The root is the empty prefix;
//! each edge consumes one identifier. A node can be a terminal (a complete
//! variant ends here) and still have children (a longer variant shares the
//! prefix), so callers check both after every step.
//!
//! Nodes live in one arena and refer to each other by index. The trie is
//! built once per configuration and is read-only afterwards, so any number
//! of match contexts may walk it concurrently.

use crate::domain::value_objects::{GroupSignature, InstUid, Variant};
use std::collections::HashMap;
use thiserror::Error;

/// Index of a node in the trie arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The empty prefix
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// Payload of a node where a registered variant ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terminal {
    /// Signature of the variant
    pub signature: GroupSignature,
    /// Index of the owning group in the registry
    pub group: usize,
    /// Index of the variant within its group
    pub variant: usize,
    /// Length of the variant
    pub depth: usize,
}

/// A full sequence was inserted twice
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("sequence already terminates at node {node:?} (group {}, variant {})", .existing.group, .existing.variant)]
pub struct TerminalConflict {
    pub node: NodeId,
    pub existing: Terminal,
}

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: HashMap<InstUid, NodeId>,
    terminal: Option<Terminal>,
}

/// Prefix tree keyed by instruction identifiers
#[derive(Clone, Debug)]
pub struct RadixTrie {
    nodes: Vec<TrieNode>,
    terminals: usize,
    max_depth: usize,
}

impl RadixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            terminals: 0,
            max_depth: 0,
        }
    }

    /// Insert a variant, marking its last node as a terminal.
    ///
    /// Fails if the exact sequence is already present; the existing trie is
    /// left unchanged in that case.
    pub fn insert(
        &mut self,
        variant: &Variant,
        signature: GroupSignature,
        group: usize,
        variant_index: usize,
    ) -> Result<NodeId, TerminalConflict> {
        let mut current = NodeId::ROOT;

        for uid in variant.iter() {
            current = match self.nodes[current.index()].children.get(uid) {
                Some(&next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(TrieNode::default());
                    self.nodes[current.index()].children.insert(*uid, next);
                    next
                }
            };
        }

        let node = &mut self.nodes[current.index()];
        if let Some(existing) = node.terminal {
            return Err(TerminalConflict {
                node: current,
                existing,
            });
        }

        node.terminal = Some(Terminal {
            signature,
            group,
            variant: variant_index,
            depth: variant.len(),
        });
        self.terminals += 1;
        self.max_depth = self.max_depth.max(variant.len());
        Ok(current)
    }

    /// Follow the edge labeled `uid`. `None` means the running prefix
    /// cannot extend to any registered variant.
    #[inline]
    pub fn step(&self, node: NodeId, uid: InstUid) -> Option<NodeId> {
        self.nodes.get(node.index())?.children.get(&uid).copied()
    }

    /// Terminal payload of a node, if a variant ends there.
    #[inline]
    pub fn terminal(&self, node: NodeId) -> Option<&Terminal> {
        self.nodes.get(node.index())?.terminal.as_ref()
    }

    /// True if no registered variant extends past this node.
    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.index())
            .map(|n| n.children.is_empty())
            .unwrap_or(true)
    }

    /// Walk a whole sequence from the root.
    pub fn walk(&self, uids: &[InstUid]) -> Option<NodeId> {
        uids.iter()
            .try_fold(NodeId::ROOT, |node, uid| self.step(node, *uid))
    }

    /// Terminal for an exact sequence.
    pub fn lookup(&self, uids: &[InstUid]) -> Option<&Terminal> {
        self.walk(uids).and_then(|node| self.terminal(node))
    }

    /// True if `uids` is a prefix of (or equal to) some registered variant.
    pub fn is_prefix(&self, uids: &[InstUid]) -> bool {
        self.walk(uids).is_some()
    }

    /// All terminals, in arena order.
    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.nodes.iter().filter_map(|n| n.terminal.as_ref())
    }

    /// Number of registered variants
    pub fn len(&self) -> usize {
        self.terminals
    }

    pub fn is_empty(&self) -> bool {
        self.terminals == 0
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest registered variant
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for RadixTrie {
    fn default() -> Self {
        Self::new()
    }
}
