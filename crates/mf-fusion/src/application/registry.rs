//! Group registry
//!
//! Turns group configurations into validated `FusionGroup`s and indexes
//! every variant in the sequence trie. Registration is all-or-nothing per
//! group: a rejected group leaves the registry unchanged.

use crate::algorithms::hash::jenkins_one_at_a_time;
use crate::algorithms::normalize::normalize_spec;
use crate::algorithms::radix_trie::RadixTrie;
use crate::config::FusionConfig;
use crate::domain::entities::{ConstraintFn, FusionGroup, FusionGroupCfg, Instruction, TransformFn};
use crate::domain::errors::ConfigError;
use crate::domain::value_objects::{GroupSignature, Variant};
use crate::ports::outbound::InstructionDecoder;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Registered groups plus the index over their variants
pub struct GroupRegistry<I> {
    pub(crate) config: FusionConfig,
    pub(crate) groups: Vec<FusionGroup<I>>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) trie: RadixTrie,
    signatures: HashMap<GroupSignature, usize>,
}

impl<I: Instruction + 'static> GroupRegistry<I> {
    /// Create an empty registry with default config
    pub fn new() -> Self {
        Self::build(FusionConfig::default())
    }

    /// Create an empty registry with custom config
    pub fn with_config(config: FusionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: FusionConfig) -> Self {
        Self {
            config,
            groups: Vec::new(),
            by_name: HashMap::new(),
            trie: RadixTrie::new(),
            signatures: HashMap::new(),
        }
    }

    /// Register one group from already-normalized variants.
    pub fn register_group(
        &mut self,
        name: impl Into<String>,
        variants: Vec<Variant>,
        constraint: ConstraintFn<I>,
        transform: TransformFn<I>,
    ) -> Result<&FusionGroup<I>, ConfigError> {
        let name = name.into();
        let hashed = self.validate_group(&name, variants)?;
        let index = self.groups.len();

        for (variant_index, (variant, signature)) in hashed.iter().enumerate() {
            self.trie
                .insert(variant, *signature, index, variant_index)
                .map_err(|conflict| ConfigError::DuplicateVariant {
                    group: name.clone(),
                    existing: self.groups[conflict.existing.group].name().to_string(),
                    sequence: variant.as_slice().to_vec(),
                })?;
            self.signatures.insert(*signature, index);
        }

        debug!(
            group = %name,
            variants = hashed.len(),
            signature = %hashed[0].1,
            "registered fusion group"
        );

        self.by_name.insert(name.clone(), index);
        self.groups
            .push(FusionGroup::new(name, hashed, constraint, transform));
        Ok(&self.groups[index])
    }

    /// Normalize a group configuration through the decoder and register it.
    pub fn register<D>(
        &mut self,
        cfg: FusionGroupCfg<I>,
        decoder: &D,
    ) -> Result<&FusionGroup<I>, ConfigError>
    where
        D: InstructionDecoder + ?Sized,
    {
        let (spec, constraint, transform) = cfg.into_parts();
        let variants = normalize_spec(&spec, decoder)?;
        self.register_group(spec.name, variants, constraint, transform)
    }

    /// Register every configuration, stopping at the first error.
    pub fn build_from_cfg<D>(
        &mut self,
        cfgs: impl IntoIterator<Item = FusionGroupCfg<I>>,
        decoder: &D,
    ) -> Result<(), ConfigError>
    where
        D: InstructionDecoder + ?Sized,
    {
        for cfg in cfgs {
            self.register(cfg, decoder)?;
        }
        Ok(())
    }

    /// Check a candidate group against itself and the registry, returning
    /// each variant paired with its signature.
    fn validate_group(
        &self,
        name: &str,
        variants: Vec<Variant>,
    ) -> Result<Vec<(Variant, GroupSignature)>, ConfigError> {
        if self.by_name.contains_key(name) {
            return Err(ConfigError::DuplicateGroup {
                name: name.to_string(),
            });
        }

        if variants.is_empty() {
            return Err(ConfigError::EmptyGroup {
                name: name.to_string(),
            });
        }

        let mut pending: HashMap<GroupSignature, usize> = HashMap::new();
        let mut hashed = Vec::with_capacity(variants.len());

        for (index, variant) in variants.iter().enumerate() {
            if variant.len() > self.config.max_variant_len {
                return Err(ConfigError::VariantTooLong {
                    group: name.to_string(),
                    len: variant.len(),
                    max: self.config.max_variant_len,
                });
            }

            if let Some(existing) = self.trie.lookup(variant.as_slice()) {
                return Err(ConfigError::DuplicateVariant {
                    group: name.to_string(),
                    existing: self.groups[existing.group].name().to_string(),
                    sequence: variant.as_slice().to_vec(),
                });
            }

            let signature = jenkins_one_at_a_time(variant.as_slice());

            if let Some(&owner) = self.signatures.get(&signature) {
                // Exact duplicates were caught above, so this is a different sequence
                return Err(ConfigError::SignatureCollision {
                    signature,
                    group: name.to_string(),
                    existing: self.groups[owner].name().to_string(),
                });
            }

            if let Some(previous) = pending.insert(signature, index) {
                return Err(if variants[previous] == *variant {
                    ConfigError::DuplicateVariant {
                        group: name.to_string(),
                        existing: name.to_string(),
                        sequence: variant.as_slice().to_vec(),
                    }
                } else {
                    ConfigError::SignatureCollision {
                        signature,
                        group: name.to_string(),
                        existing: name.to_string(),
                    }
                });
            }

            hashed.push(signature);
        }

        Ok(variants.into_iter().zip(hashed).collect())
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn groups(&self) -> &[FusionGroup<I>] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&FusionGroup<I>> {
        self.by_name.get(name).map(|&i| &self.groups[i])
    }

    pub fn trie(&self) -> &RadixTrie {
        &self.trie
    }

    /// Number of registered groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group name to primary-variant signature, for golden comparisons.
    pub fn expected_signatures(&self) -> BTreeMap<String, GroupSignature> {
        self.groups
            .iter()
            .map(|g| (g.name().to_string(), g.signature()))
            .collect()
    }
}

impl<I: Instruction + 'static> Default for GroupRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}
