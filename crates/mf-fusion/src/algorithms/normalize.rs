//! Configuration normalization
//!
//! Every configuration shape collapses to the same identifier sequence
//! before indexing. The mapping is total over supported shapes and keeps
//! source order.

use crate::adapters::file_source::{read_variant_file, VariantToken};
use crate::domain::errors::ConfigError;
use crate::domain::value_objects::{GroupSpec, InstUid, Variant, VariantSource};
use crate::ports::outbound::InstructionDecoder;

/// Resolve one variant source to identifiers, in source order.
pub fn normalize_source<D>(source: &VariantSource, decoder: &D) -> Result<Vec<InstUid>, ConfigError>
where
    D: InstructionDecoder + ?Sized,
{
    let uids = match source {
        VariantSource::Uids(uids) => uids.clone(),
        VariantSource::Opcodes(opcodes) => opcodes
            .iter()
            .map(|op| decoder.uid_for_opcode(*op))
            .collect::<Result<_, _>>()?,
        VariantSource::Mnemonics(names) => names
            .iter()
            .map(|name| decoder.uid_for_mnemonic(name))
            .collect::<Result<_, _>>()?,
        VariantSource::File(path) => read_variant_file(path)?
            .iter()
            .map(|token| match token {
                VariantToken::Opcode(op) => decoder.uid_for_opcode(*op),
                VariantToken::Mnemonic(name) => decoder.uid_for_mnemonic(name),
            })
            .collect::<Result<_, _>>()?,
    };
    Ok(uids)
}

/// Normalize every variant of a group spec.
///
/// Fails on a group without variants or a variant that resolves to an
/// empty sequence.
pub fn normalize_spec<D>(spec: &GroupSpec, decoder: &D) -> Result<Vec<Variant>, ConfigError>
where
    D: InstructionDecoder + ?Sized,
{
    if spec.variants.is_empty() {
        return Err(ConfigError::EmptyGroup {
            name: spec.name.clone(),
        });
    }

    spec.variants
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let uids = normalize_source(source, decoder)?;
            Variant::new(uids).ok_or_else(|| ConfigError::EmptyVariant {
                group: spec.name.clone(),
                index,
            })
        })
        .collect()
}
