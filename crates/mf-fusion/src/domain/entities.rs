//! Core entities for instruction fusion
//!
//! A `FusionGroup` is one named optimization opportunity: its variants,
//! a constraint deciding whether a syntactic match is fusible, and the
//! transform producing the replacement.

use super::value_objects::{
    FusionStats, GroupSignature, GroupSpec, InstUid, Opcode, Variant, VariantSource,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A decoded instruction as seen by the engine.
///
/// The engine only ever asks for the identifier. Register operands,
/// immediates and the like are for constraints and transforms.
pub trait Instruction: Send + Sync {
    /// `None` when the decoder could not identify the instruction; such an
    /// instruction never extends a match and passes through unchanged.
    fn uid(&self) -> Option<InstUid>;
}

/// Shared handle to a caller-owned decoded instruction
pub type InstPtr<I> = Arc<I>;

/// Ordered list of instruction handles
pub type InstPtrList<I> = Vec<InstPtr<I>>;

/// Constraint callable: `(group, window, accepted, rejected) -> fusible`.
///
/// May partition the window into `accepted` and `rejected`. Returning
/// `false` makes the match behave exactly like a non-match.
pub type ConstraintFn<I> = Arc<
    dyn Fn(&FusionGroup<I>, &[InstPtr<I>], &mut InstPtrList<I>, &mut InstPtrList<I>) -> bool
        + Send
        + Sync,
>;

/// Transform callable: `(group, accepted) -> replacement`
pub type TransformFn<I> = Arc<dyn Fn(&FusionGroup<I>, &[InstPtr<I>]) -> InstPtrList<I> + Send + Sync>;

/// Constraint that accepts every window as-is.
pub fn always_accept<I: 'static>() -> ConstraintFn<I> {
    Arc::new(
        |_: &FusionGroup<I>, _: &[InstPtr<I>], _: &mut InstPtrList<I>, _: &mut InstPtrList<I>| true,
    )
}

/// Transform that returns the accepted window unchanged.
pub fn identity_transform<I: 'static>() -> TransformFn<I> {
    Arc::new(|_: &FusionGroup<I>, window: &[InstPtr<I>]| window.to_vec())
}

/// A registered fusion group
pub struct FusionGroup<I> {
    name: String,
    variants: Vec<Variant>,
    signatures: Vec<GroupSignature>,
    constraint: ConstraintFn<I>,
    transform: TransformFn<I>,
}

impl<I> FusionGroup<I> {
    /// Built by the registry, which validates and hashes the variants.
    pub(crate) fn new(
        name: String,
        variants: Vec<(Variant, GroupSignature)>,
        constraint: ConstraintFn<I>,
        transform: TransformFn<I>,
    ) -> Self {
        let (variants, signatures) = variants.into_iter().unzip();
        Self {
            name,
            variants,
            signatures,
            constraint,
            transform,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Signature of the primary (first declared) variant.
    pub fn signature(&self) -> GroupSignature {
        self.signatures[0]
    }

    /// Signatures of all variants, in declaration order.
    pub fn variant_signatures(&self) -> &[GroupSignature] {
        &self.signatures
    }

    /// Run the constraint over a matched window.
    pub fn check_constraint(
        &self,
        window: &[InstPtr<I>],
        accepted: &mut InstPtrList<I>,
        rejected: &mut InstPtrList<I>,
    ) -> bool {
        (self.constraint)(self, window, accepted, rejected)
    }

    /// Run the transform over the accepted part of a window.
    pub fn apply_transform(&self, accepted: &[InstPtr<I>]) -> InstPtrList<I> {
        (self.transform)(self, accepted)
    }
}

impl<I> fmt::Debug for FusionGroup<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FusionGroup")
            .field("name", &self.name)
            .field("variants", &self.variants)
            .field("signatures", &self.signatures)
            .finish_non_exhaustive()
    }
}

/// Result of one scan: the rewritten stream and its counters
pub struct FusionOutcome<I> {
    pub output: InstPtrList<I>,
    pub stats: FusionStats,
}

impl<I> fmt::Debug for FusionOutcome<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FusionOutcome")
            .field("output_len", &self.output.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Configuration for one fusion group: the serializable `GroupSpec` plus the
/// constraint and transform to attach.
///
/// # Example
///
/// ```
/// use mf_fusion::{FusionGroupCfg, InstUid, Instruction};
///
/// struct Inst(u32);
/// impl Instruction for Inst {
///     fn uid(&self) -> Option<InstUid> {
///         Some(InstUid(self.0))
///     }
/// }
///
/// let cfg = FusionGroupCfg::<Inst>::new("lui_addi")
///     .uids(vec![InstUid(1), InstUid(2)])
///     .constraint(|_, window, _, _| window.len() == 2);
/// assert_eq!(cfg.spec().variants.len(), 1);
/// ```
pub struct FusionGroupCfg<I> {
    spec: GroupSpec,
    constraint: Option<ConstraintFn<I>>,
    transform: Option<TransformFn<I>>,
}

impl<I> FusionGroupCfg<I> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_spec(GroupSpec::new(name))
    }

    /// Wrap a `GroupSpec` loaded from JSON; callables default until set.
    pub fn from_spec(spec: GroupSpec) -> Self {
        Self {
            spec,
            constraint: None,
            transform: None,
        }
    }

    pub fn variant(mut self, source: VariantSource) -> Self {
        self.spec.variants.push(source);
        self
    }

    pub fn uids(self, uids: Vec<InstUid>) -> Self {
        self.variant(VariantSource::Uids(uids))
    }

    pub fn opcodes(self, opcodes: Vec<Opcode>) -> Self {
        self.variant(VariantSource::Opcodes(opcodes))
    }

    pub fn mnemonics<S: Into<String>>(self, mnemonics: impl IntoIterator<Item = S>) -> Self {
        self.variant(VariantSource::Mnemonics(
            mnemonics.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn file(self, path: impl Into<PathBuf>) -> Self {
        self.variant(VariantSource::File(path.into()))
    }

    pub fn constraint<F>(mut self, f: F) -> Self
    where
        F: Fn(&FusionGroup<I>, &[InstPtr<I>], &mut InstPtrList<I>, &mut InstPtrList<I>) -> bool
            + Send
            + Sync
            + 'static,
    {
        self.constraint = Some(Arc::new(f));
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&FusionGroup<I>, &[InstPtr<I>]) -> InstPtrList<I> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &GroupSpec {
        &self.spec
    }

    pub(crate) fn into_parts(self) -> (GroupSpec, ConstraintFn<I>, TransformFn<I>)
    where
        I: 'static,
    {
        (
            self.spec,
            self.constraint.unwrap_or_else(always_accept),
            self.transform.unwrap_or_else(identity_transform),
        )
    }
}

impl<I> fmt::Debug for FusionGroupCfg<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FusionGroupCfg")
            .field("spec", &self.spec)
            .field("has_constraint", &self.constraint.is_some())
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}
